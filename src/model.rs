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

//! The trained model: a vocabulary paired with its `|V| x L` embedding
//! matrix, and an L2-normalized view of it used for similarity search.

use crate::error::{Error, Result};
use crate::vocab::Vocabulary;

/// A trained embedding matrix, row-major, one row of `layer_size` values
/// per vocabulary entry.
#[derive(Debug, Clone)]
pub struct Model {
    vocab: Vocabulary,
    layer_size: usize,
    vectors: Vec<f32>,
}

impl Model {
    /// # Panics
    /// If `vectors.len() != vocab.len() * layer_size`.
    pub fn new(vocab: Vocabulary, layer_size: usize, vectors: Vec<f32>) -> Model {
        assert_eq!(vectors.len(), vocab.len() * layer_size);
        Model {
            vocab,
            layer_size,
            vectors,
        }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn layer_size(&self) -> usize {
        self.layer_size
    }

    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    pub fn vector(&self, index: usize) -> &[f32] {
        &self.vectors[index * self.layer_size..(index + 1) * self.layer_size]
    }

    pub fn vector_for(&self, token: &str) -> Result<&[f32]> {
        let idx = self
            .vocab
            .index_of(token)
            .ok_or_else(|| Error::UnknownWord(token.to_string()))?;
        Ok(self.vector(idx))
    }

    pub fn vectors(&self) -> &[f32] {
        &self.vectors
    }
}

/// A [`Model`] whose rows have been L2-normalized, so that a dot product
/// between two rows is their cosine similarity. Rows with zero norm (only
/// possible for a token that never received a gradient update) are left
/// as all-zero.
#[derive(Debug, Clone)]
pub struct NormalizedModel {
    model: Model,
    normalized: Vec<f32>,
}

impl NormalizedModel {
    pub fn from_model(model: Model) -> NormalizedModel {
        let layer_size = model.layer_size();
        let mut normalized = model.vectors.clone();
        for row in normalized.chunks_mut(layer_size) {
            let norm = row.iter().fold(0.0f32, |acc, &v| acc + v * v).sqrt();
            if norm > 0.0 {
                for v in row.iter_mut() {
                    *v /= norm;
                }
            }
        }
        NormalizedModel { model, normalized }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn normalized_vector(&self, index: usize) -> &[f32] {
        let l = self.model.layer_size();
        &self.normalized[index * l..(index + 1) * l]
    }

    pub fn normalized_vector_for(&self, token: &str) -> Result<&[f32]> {
        let idx = self
            .model
            .vocab()
            .index_of(token)
            .ok_or_else(|| Error::UnknownWord(token.to_string()))?;
        Ok(self.normalized_vector(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vocab() -> Vocabulary {
        let counts: HashMap<String, u32> =
            [("a", 3), ("b", 2)].iter().map(|(w, c)| (w.to_string(), *c)).collect();
        Vocabulary::from_counts(counts, 0).unwrap()
    }

    #[test]
    fn vector_for_looks_up_by_token() {
        let model = Model::new(vocab(), 2, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(model.vector_for("a").unwrap(), &[1.0, 2.0]);
        assert_eq!(model.vector_for("b").unwrap(), &[3.0, 4.0]);
        assert!(model.vector_for("z").is_err());
    }

    #[test]
    fn normalized_rows_have_unit_length() {
        let model = Model::new(vocab(), 2, vec![3.0, 4.0, 0.0, 0.0]);
        let normalized = NormalizedModel::from_model(model);
        let row = normalized.normalized_vector(0);
        let norm = (row[0] * row[0] + row[1] * row[1]).sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        // zero vector stays zero instead of producing NaN
        assert_eq!(normalized.normalized_vector(1), &[0.0, 0.0]);
    }
}
