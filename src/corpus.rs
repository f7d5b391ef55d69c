//  Copyright 2026 Robert Zavalczki
//  Copyright 2013 Google Inc. All Rights Reserved.
//
//  Licensed under the Apache License, Version 2.0 (the "License");
//  you may not use this file except in compliance with the License.
//  You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.

//! Vocabulary-resolved training corpus: sentences with out-of-vocabulary
//! tokens dropped and long sentences split into fixed-size chunks.

use crate::vocab::Vocabulary;

/// Sentences longer than this are split into contiguous chunks of this
/// length; window arithmetic never crosses a chunk boundary.
pub const MAX_SENTENCE_LENGTH: usize = 1000;

/// A materialized, vocabulary-resolved corpus, ready to be partitioned
/// across worker threads.
pub struct Corpus {
    chunks: Vec<Vec<u32>>,
    num_trained_tokens: u64,
}

impl Corpus {
    /// Resolves every token against `vocab`, dropping out-of-vocabulary
    /// tokens, and splits sentences longer than [`MAX_SENTENCE_LENGTH`]
    /// into separate chunks. `num_trained_tokens` counts every
    /// in-vocabulary token plus one per input sentence, accounting for the
    /// (never materialized) end-of-sentence marker.
    pub fn prepare<S, T, I>(sentences: I, vocab: &Vocabulary) -> Corpus
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut chunks: Vec<Vec<u32>> = Vec::new();
        let mut num_trained_tokens: u64 = 0;

        for sentence in sentences {
            num_trained_tokens += 1;
            let mut current: Vec<u32> = Vec::new();
            for token in sentence {
                if let Some(idx) = vocab.index_of(token.as_ref()) {
                    num_trained_tokens += 1;
                    current.push(idx as u32);
                    if current.len() >= MAX_SENTENCE_LENGTH {
                        chunks.push(std::mem::take(&mut current));
                    }
                }
            }
            if !current.is_empty() {
                chunks.push(current);
            }
        }

        Corpus {
            chunks,
            num_trained_tokens,
        }
    }

    pub fn num_trained_tokens(&self) -> u64 {
        self.num_trained_tokens
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Splits the corpus into `num_threads` roughly equal, contiguous
    /// batches of chunks.
    pub fn partition(&self, num_threads: usize) -> Vec<&[Vec<u32>]> {
        if self.chunks.is_empty() {
            return vec![&[]; num_threads];
        }
        let batch_size = self.chunks.len().div_ceil(num_threads).max(1);
        let mut batches: Vec<&[Vec<u32>]> = self.chunks.chunks(batch_size).collect();
        while batches.len() < num_threads {
            batches.push(&[]);
        }
        batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vocab() -> Vocabulary {
        let counts: HashMap<String, u32> = [("a", 5), ("b", 5), ("c", 5)]
            .iter()
            .map(|(w, c)| (w.to_string(), *c))
            .collect();
        Vocabulary::from_counts(counts, 0).unwrap()
    }

    #[test]
    fn drops_out_of_vocabulary_tokens() {
        let v = vocab();
        let sentences = vec![vec!["a", "zzz", "b"]];
        let corpus = Corpus::prepare(sentences, &v);
        assert_eq!(corpus.chunk_count(), 1);
        // 2 in-vocab tokens + 1 sentence marker
        assert_eq!(corpus.num_trained_tokens(), 3);
    }

    #[test]
    fn splits_long_sentences_into_chunks() {
        let v = vocab();
        let long_sentence: Vec<&str> = std::iter::repeat("a").take(2500).collect();
        let corpus = Corpus::prepare(vec![long_sentence], &v);
        assert_eq!(corpus.chunk_count(), 3);
        assert_eq!(corpus.num_trained_tokens(), 2501);
    }

    #[test]
    fn partition_is_roughly_equal_and_contiguous() {
        let v = vocab();
        let sentences: Vec<Vec<&str>> = (0..10).map(|_| vec!["a", "b", "c"]).collect();
        let corpus = Corpus::prepare(sentences, &v);
        let parts = corpus.partition(3);
        assert_eq!(parts.len(), 3);
        let total: usize = parts.iter().map(|p| p.len()).sum();
        assert_eq!(total, corpus.chunk_count());
    }
}
