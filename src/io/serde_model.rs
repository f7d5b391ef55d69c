//  Copyright 2026 Robert Zavalczki
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

//! A serde/JSON model format: a drop-in for the cross-language
//! (originally thrift) externalization used to hand a trained model to
//! non-Rust collaborators. The schema is flat and self-describing: the
//! vocabulary as a plain list of tokens in row order, the layer size, and
//! the flattened row-major vector array as doubles.

use std::fs::File;
use std::io::{BufReader, BufWriter};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Model;
use crate::vocab::{VocabEntry, Vocabulary};

#[derive(Debug, Serialize, Deserialize)]
pub struct SerializableModel {
    pub vocab: Vec<String>,
    pub layer_size: usize,
    pub vectors: Vec<f64>,
}

impl From<&Model> for SerializableModel {
    fn from(model: &Model) -> Self {
        SerializableModel {
            vocab: model.vocab().entries().iter().map(|e| e.token.clone()).collect(),
            layer_size: model.layer_size(),
            vectors: model.vectors().iter().map(|&v| v as f64).collect(),
        }
    }
}

impl TryFrom<SerializableModel> for Model {
    type Error = crate::error::Error;

    fn try_from(value: SerializableModel) -> std::result::Result<Self, Self::Error> {
        // The external schema doesn't carry counts; row order is all that
        // matters on reload, so every entry gets a placeholder count.
        let entries = value
            .vocab
            .into_iter()
            .map(|token| VocabEntry { token, count: 1 })
            .collect();
        let vocab = Vocabulary::from_entries(entries)?;
        let vectors = value.vectors.into_iter().map(|v| v as f32).collect();
        Ok(Model::new(vocab, value.layer_size, vectors))
    }
}

pub fn save(model: &Model, path: &str) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    let serializable = SerializableModel::from(model);
    serde_json::to_writer(writer, &serializable)?;
    Ok(())
}

pub fn load(path: &str) -> Result<Model> {
    let reader = BufReader::new(File::open(path)?);
    let serializable: SerializableModel = serde_json::from_reader(reader)?;
    Model::try_from(serializable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn round_trips_through_a_json_file() {
        let counts: HashMap<String, u32> =
            [("a", 3), ("b", 2)].iter().map(|(w, c)| (w.to_string(), *c)).collect();
        let vocab = Vocabulary::from_counts(counts, 0).unwrap();
        let model = Model::new(vocab, 2, vec![1.0, 2.0, 3.0, 4.0]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let path = path.to_str().unwrap();

        save(&model, path).unwrap();
        let loaded = load(path).unwrap();

        assert_eq!(loaded.len(), model.len());
        assert_eq!(loaded.vector_for("a").unwrap(), model.vector_for("a").unwrap());
    }
}
