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

//! Nearest-neighbor, cosine-distance, and analogy search over a trained
//! model, via an L2-normalized copy of its vectors.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::model::NormalizedModel;

/// A single scored search result: a vocabulary token and its similarity to
/// the query vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub token: String,
    pub similarity: f32,
}

struct ScoredIndex {
    similarity: f32,
    index: usize,
}

impl PartialEq for ScoredIndex {
    fn eq(&self, other: &Self) -> bool {
        self.similarity == other.similarity && self.index == other.index
    }
}
impl Eq for ScoredIndex {}

impl PartialOrd for ScoredIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredIndex {
    // Reversed on similarity so `BinaryHeap` (a max-heap) behaves as a
    // min-heap keyed on similarity: the worst-scoring candidate currently
    // held is always at the top, evictable in O(log k). Ties broken by
    // index ascending, matching vocabulary order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .similarity
            .partial_cmp(&self.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Nearest-neighbor and analogy search over an L2-normalized model.
pub struct Searcher {
    model: NormalizedModel,
}

impl Searcher {
    pub fn new(model: NormalizedModel) -> Searcher {
        Searcher { model }
    }

    pub fn model(&self) -> &NormalizedModel {
        &self.model
    }

    pub fn contains(&self, word: &str) -> bool {
        self.model.model().vocab().contains(word)
    }

    /// The model's raw (un-normalized) vector for `word`.
    pub fn raw_vector(&self, word: &str) -> Result<&[f32]> {
        self.model.model().vector_for(word)
    }

    /// The dot product of `a` and `b`'s normalized vectors.
    pub fn cosine_distance(&self, a: &str, b: &str) -> Result<f32> {
        let va = self.model.normalized_vector_for(a)?;
        let vb = self.model.normalized_vector_for(b)?;
        Ok(dot(va, vb))
    }

    /// Top `k` tokens by cosine similarity to `word`, descending, ties
    /// broken by vocabulary order. The query word itself is not excluded:
    /// it is always its own best match, and is expected to appear first.
    pub fn get_matches(&self, word: &str, k: usize) -> Result<Vec<Neighbor>> {
        let query = self.model.normalized_vector_for(word)?.to_vec();
        Ok(self.top_k(&query, k))
    }

    /// Same as [`Self::get_matches`], but against an arbitrary vector
    /// rather than a vocabulary entry. `vec` is used as-is, without
    /// normalization — a deliberate deviation from normalizing every
    /// query, since the caller may already be passing a normalized or
    /// otherwise pre-scaled vector.
    pub fn get_matches_for_vector(&self, vec: &[f32], k: usize) -> Vec<Neighbor> {
        debug_assert_eq!(vec.len(), self.model.model().layer_size());
        self.top_k(vec, k)
    }

    /// `d = normalized(a) - normalized(b)`, to be combined with a third
    /// word's vector via [`SemanticDifference::get_matches`] — the
    /// classic analogy query `word - a + b`.
    pub fn semantic_difference<'a>(&'a self, a: &str, b: &str) -> Result<SemanticDifference<'a>> {
        let va = self.model.normalized_vector_for(a)?;
        let vb = self.model.normalized_vector_for(b)?;
        let diff = va.iter().zip(vb).map(|(x, y)| x - y).collect();
        Ok(SemanticDifference { searcher: self, diff })
    }

    /// Runs in `O(n + k log k)`: one linear pass maintaining a size-`k`
    /// min-heap of the best candidates seen so far, followed by draining
    /// and sorting that heap.
    fn top_k(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        if k == 0 {
            return Vec::new();
        }
        let mut heap: BinaryHeap<ScoredIndex> = BinaryHeap::with_capacity(k + 1);

        for index in 0..self.model.model().len() {
            let candidate = self.model.normalized_vector(index);
            let similarity = dot(query, candidate);

            if heap.len() < k {
                heap.push(ScoredIndex { similarity, index });
            } else if let Some(worst) = heap.peek() {
                if similarity > worst.similarity {
                    heap.pop();
                    heap.push(ScoredIndex { similarity, index });
                }
            }
        }

        let mut results: Vec<ScoredIndex> = heap.into_vec();
        results.sort_unstable_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.index.cmp(&b.index))
        });

        results
            .into_iter()
            .map(|s| Neighbor {
                token: self.model.model().vocab().token(s.index).to_string(),
                similarity: s.similarity,
            })
            .collect()
    }
}

/// The difference between two normalized word vectors, as returned by
/// [`Searcher::semantic_difference`]. Not itself re-normalized: it is an
/// intermediate query vector, not a unit vector in its own right.
pub struct SemanticDifference<'a> {
    searcher: &'a Searcher,
    diff: Vec<f32>,
}

impl<'a> SemanticDifference<'a> {
    /// Top `k` matches against `normalized(word) - d`, where `d` is this
    /// difference. For `d = normalized(a) - normalized(b)`, this answers
    /// the analogy `word - a + b`.
    pub fn get_matches(&self, word: &str, k: usize) -> Result<Vec<Neighbor>> {
        let base = self
            .searcher
            .model
            .normalized_vector_for(word)
            .map_err(|_| Error::UnknownWord(word.to_string()))?;
        let query: Vec<f32> = base.iter().zip(&self.diff).map(|(w, d)| w - d).collect();
        Ok(self.searcher.get_matches_for_vector(&query, k))
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).fold(0.0, |acc, (x, y)| acc + x * y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use crate::vocab::Vocabulary;
    use std::collections::HashMap;

    fn model() -> NormalizedModel {
        let counts: HashMap<String, u32> = [("king", 5), ("queen", 5), ("man", 5), ("woman", 5), ("dog", 5)]
            .iter()
            .map(|(w, c)| (w.to_string(), *c))
            .collect();
        let vocab = Vocabulary::from_counts(counts, 0).unwrap();
        // Hand-placed 2D vectors: king/man/woman/queen live on a "royalty"
        // axis and a "gender" axis; dog is unrelated.
        let mut vectors = vec![0.0f32; vocab.len() * 2];
        let put = |vectors: &mut Vec<f32>, idx: usize, x: f32, y: f32| {
            vectors[idx * 2] = x;
            vectors[idx * 2 + 1] = y;
        };
        put(&mut vectors, vocab.index_of("king").unwrap(), 1.0, 1.0);
        put(&mut vectors, vocab.index_of("queen").unwrap(), 1.0, -1.0);
        put(&mut vectors, vocab.index_of("man").unwrap(), 0.1, 1.0);
        put(&mut vectors, vocab.index_of("woman").unwrap(), 0.1, -1.0);
        put(&mut vectors, vocab.index_of("dog").unwrap(), -5.0, 0.2);
        NormalizedModel::from_model(Model::new(vocab, 2, vectors))
    }

    #[test]
    fn get_matches_includes_the_query_word_first() {
        let searcher = Searcher::new(model());
        let results = searcher.get_matches("king", 5).unwrap();
        assert_eq!(results[0].token, "king");
        assert!((results[0].similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn get_matches_is_sorted_descending() {
        let searcher = Searcher::new(model());
        let results = searcher.get_matches("king", 5).unwrap();
        for w in results.windows(2) {
            assert!(w[0].similarity >= w[1].similarity);
        }
    }

    #[test]
    fn unknown_word_is_an_error() {
        let searcher = Searcher::new(model());
        assert!(matches!(searcher.get_matches("nope", 1), Err(Error::UnknownWord(_))));
    }

    #[test]
    fn contains_reflects_vocabulary_membership() {
        let searcher = Searcher::new(model());
        assert!(searcher.contains("king"));
        assert!(!searcher.contains("nope"));
    }

    #[test]
    fn cosine_distance_of_a_word_with_itself_is_one() {
        let searcher = Searcher::new(model());
        let d = searcher.cosine_distance("king", "king").unwrap();
        assert!((d - 1.0).abs() < 1e-6);
    }

    #[test]
    fn semantic_difference_recovers_the_analogous_word() {
        let searcher = Searcher::new(model());
        // king - man + woman should land closest to queen.
        let diff = searcher.semantic_difference("man", "woman").unwrap();
        let results = diff.get_matches("king", 1).unwrap();
        assert_eq!(results[0].token, "queen");
    }

    #[test]
    fn get_matches_for_vector_does_not_normalize_the_query() {
        let searcher = Searcher::new(model());
        let raw = searcher.raw_vector("king").unwrap().to_vec();
        let results = searcher.get_matches_for_vector(&raw, 1);
        assert_eq!(results[0].token, "king");
    }
}
