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

//! Fixed-size unigram^0.75 sampling table used for negative sampling.

use crate::vocab::Vocabulary;

pub const UNIGRAM_TABLE_SIZE: usize = 100_000_000;
const WORD_POWER: f64 = 0.75;

pub struct UnigramTable {
    table: Vec<u32>,
}

impl UnigramTable {
    /// Builds the table once from a frequency-descending vocabulary. `S =
    /// sum(count(t)^0.75)`; table index `a` holds the vocabulary index
    /// whose cumulative `count^0.75` mass first exceeds `a / table_size`.
    pub fn build(vocab: &Vocabulary) -> UnigramTable {
        assert!(!vocab.is_empty());

        let train_words_pow: f64 = vocab
            .entries()
            .iter()
            .fold(0.0f64, |acc, e| acc + (e.count as f64).powf(WORD_POWER));

        let mut table = vec![0u32; UNIGRAM_TABLE_SIZE];
        let mut word_idx: usize = 0;
        let mut d1 = (vocab.count(0) as f64).powf(WORD_POWER) / train_words_pow;

        for (a, slot) in table.iter_mut().enumerate() {
            *slot = word_idx as u32;
            if (a as f64 / UNIGRAM_TABLE_SIZE as f64) > d1 {
                word_idx += 1;
                if word_idx >= vocab.len() {
                    word_idx = vocab.len() - 1;
                } else {
                    d1 += (vocab.count(word_idx) as f64).powf(WORD_POWER) / train_words_pow;
                }
            }
        }

        UnigramTable { table }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Reads the table by the worker's raw PRNG state `r`, per the
    /// `(((r >> 16) mod 1e8) + 1e8) mod 1e8` indexing scheme.
    #[inline]
    pub fn sample(&self, r: u64) -> u32 {
        let idx = (((r >> 16) % UNIGRAM_TABLE_SIZE as u64) + UNIGRAM_TABLE_SIZE as u64)
            % UNIGRAM_TABLE_SIZE as u64;
        self.table[idx as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vocab(counts: &[(&str, u32)]) -> Vocabulary {
        let counts = counts
            .iter()
            .map(|(w, c)| (w.to_string(), *c))
            .collect::<HashMap<_, _>>();
        Vocabulary::from_counts(counts, 0).unwrap()
    }

    #[test]
    fn table_has_fixed_size() {
        let v = vocab(&[("a", 10), ("b", 5), ("c", 1)]);
        let table = UnigramTable::build(&v);
        assert_eq!(table.len(), UNIGRAM_TABLE_SIZE);
    }

    #[test]
    fn table_entries_are_valid_vocab_indices() {
        let v = vocab(&[("a", 10), ("b", 5), ("c", 1)]);
        let table = UnigramTable::build(&v);
        assert!(table.table.iter().all(|&idx| (idx as usize) < v.len()));
        assert_eq!(*table.table.last().unwrap() as usize, v.len() - 1);
    }

    #[test]
    fn more_frequent_words_get_more_table_mass() {
        let v = vocab(&[("common", 1000), ("rare", 1)]);
        let table = UnigramTable::build(&v);
        let common_count = table.table.iter().filter(|&&i| i == 0).count();
        let rare_count = table.table.iter().filter(|&&i| i == 1).count();
        assert!(common_count > rare_count);
    }
}
