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

//! Frequency-sorted, deterministic vocabulary.
//!
//! Unlike the reference implementation, the vocabulary here is built by
//! counting every token exactly once up front; there is no mid-stream
//! hash-table reduction and no synthetic end-of-sentence token.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct VocabEntry {
    pub token: String,
    pub count: u32,
}

/// Ordered, frequency-sorted, deterministic vocabulary. Immutable once built.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: Vec<VocabEntry>,
    index: HashMap<String, u32>,
}

impl Vocabulary {
    /// Counts every token produced by `sentences`, drops tokens with
    /// `count < min_frequency`, and sorts the survivors by (count desc,
    /// token asc).
    pub fn build<S, T, I>(sentences: I, min_frequency: u32) -> Result<Vocabulary>
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for sentence in sentences {
            for token in sentence {
                *counts.entry(token.as_ref().to_string()).or_insert(0) += 1;
            }
        }
        Self::from_counts(counts, min_frequency)
    }

    /// Builds a vocabulary directly from a caller-supplied token->count map,
    /// bypassing counting.
    pub fn from_counts(counts: HashMap<String, u32>, min_frequency: u32) -> Result<Vocabulary> {
        let mut entries: Vec<VocabEntry> = counts
            .into_iter()
            .filter(|(_, count)| *count >= min_frequency)
            .map(|(token, count)| VocabEntry { token, count })
            .collect();

        entries.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.token.cmp(&b.token)));

        if entries.is_empty() {
            return Err(Error::EmptyVocabulary);
        }

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.token.clone(), i as u32))
            .collect();

        Ok(Vocabulary { entries, index })
    }

    /// Builds a vocabulary from already-ordered entries, trusting the
    /// caller's order instead of re-sorting by frequency. Used when
    /// reloading a persisted model, where entry order encodes the row
    /// order of the embedding matrix and must be preserved exactly.
    pub fn from_entries(entries: Vec<VocabEntry>) -> Result<Vocabulary> {
        if entries.is_empty() {
            return Err(Error::EmptyVocabulary);
        }
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.token.clone(), i as u32))
            .collect();
        Ok(Vocabulary { entries, index })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of (in-vocabulary, pre-filter) token occurrences.
    pub fn train_word_count(&self) -> u64 {
        self.entries.iter().map(|e| e.count as u64).sum()
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    /// Returns the index of `token` in the vocabulary, if present.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).map(|&i| i as usize)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    pub fn token(&self, index: usize) -> &str {
        &self.entries[index].token
    }

    pub fn count(&self, index: usize) -> u32 {
        self.entries[index].count
    }

    pub fn save_to_file(&self, path: &str) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        for entry in &self.entries {
            writeln!(writer, "{} {}", entry.token, entry.count)?;
        }
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Vocabulary> {
        let reader = BufReader::new(File::open(path)?);
        let mut counts: HashMap<String, u32> = HashMap::new();
        for line in reader.lines() {
            let line = line?;
            let mut parts = line.split_whitespace();
            let (Some(word), Some(count_str)) = (parts.next(), parts.next()) else {
                return Err(Error::MalformedModel(format!(
                    "invalid vocabulary line: '{line}'"
                )));
            };
            let count: u32 = count_str.parse().map_err(|_| {
                Error::MalformedModel(format!("invalid count for word '{word}': '{count_str}'"))
            })?;
            counts.insert(word.to_string(), count);
        }
        // min_frequency = 0: the file already reflects whatever filtering was
        // applied when it was saved.
        Self::from_counts(counts, 0)
    }
}

pub struct VocabularyIter<'a> {
    vocab: &'a Vocabulary,
    i: usize,
}

impl<'a> Iterator for VocabularyIter<'a> {
    type Item = &'a str;
    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.vocab.entries.len() {
            None
        } else {
            self.i += 1;
            Some(&self.vocab.entries[self.i - 1].token)
        }
    }
}

impl<'a> IntoIterator for &'a Vocabulary {
    type Item = &'a str;
    type IntoIter = VocabularyIter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        VocabularyIter { vocab: self, i: 0 }
    }
}
