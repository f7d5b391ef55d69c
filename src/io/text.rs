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

//! The plain-text model format: a `<vocab_size> <layer_size>` header
//! followed by one `<token> <v1> <v2> ... <vL>` line per vocabulary entry,
//! vectors printed to 6 decimal places.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use crate::error::{Error, Result};
use crate::model::Model;
use crate::vocab::{VocabEntry, Vocabulary};

pub fn save(model: &Model, path: &str) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{} {}", model.len(), model.layer_size())?;
    for (idx, entry) in model.vocab().entries().iter().enumerate() {
        write!(writer, "{} ", entry.token)?;
        for v in model.vector(idx) {
            write!(writer, "{v:.6} ")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn load(path: &str) -> Result<Model> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let header = lines
        .next()
        .ok_or_else(|| Error::MalformedModel("missing header line".into()))??;
    let mut header_parts = header.split_whitespace();
    let (Some(vocab_size_str), Some(layer_size_str)) = (header_parts.next(), header_parts.next()) else {
        return Err(Error::MalformedModel(format!("invalid header: '{header}'")));
    };
    let vocab_size: usize = vocab_size_str
        .parse()
        .map_err(|_| Error::MalformedModel(format!("invalid vocab size: '{vocab_size_str}'")))?;
    let layer_size: usize = layer_size_str
        .parse()
        .map_err(|_| Error::MalformedModel(format!("invalid layer size: '{layer_size_str}'")))?;

    let mut entries = Vec::with_capacity(vocab_size);
    let mut vectors = Vec::with_capacity(vocab_size * layer_size);

    for line in lines {
        let line = line?;
        let mut parts = line.split_whitespace();
        let token = parts
            .next()
            .ok_or_else(|| Error::MalformedModel("missing token on line".into()))?
            .to_string();
        let mut count = 0usize;
        for part in parts {
            let v: f32 = part
                .parse()
                .map_err(|_| Error::MalformedModel(format!("invalid vector component: '{part}'")))?;
            vectors.push(v);
            count += 1;
        }
        if count != layer_size {
            return Err(Error::MalformedModel(format!(
                "token '{token}' has {count} vector components, expected {layer_size}"
            )));
        }
        entries.push(VocabEntry { token, count: 1 });
    }

    if entries.len() != vocab_size {
        return Err(Error::MalformedModel(format!(
            "header declared {vocab_size} entries but found {}",
            entries.len()
        )));
    }

    let vocab = Vocabulary::from_entries(entries)?;
    Ok(Model::new(vocab, layer_size, vectors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_model() -> Model {
        let counts: HashMap<String, u32> =
            [("a", 3), ("b", 2)].iter().map(|(w, c)| (w.to_string(), *c)).collect();
        let vocab = Vocabulary::from_counts(counts, 0).unwrap();
        Model::new(vocab, 2, vec![1.0, 2.0, 3.0, 4.0])
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.txt");
        let path = path.to_str().unwrap();

        let model = sample_model();
        save(&model, path).unwrap();
        let loaded = load(path).unwrap();

        assert_eq!(loaded.len(), model.len());
        assert_eq!(loaded.layer_size(), model.layer_size());
        for token in ["a", "b"] {
            let original = model.vector_for(token).unwrap();
            let round_tripped = loaded.vector_for(token).unwrap();
            for (a, b) in original.iter().zip(round_tripped) {
                assert!((a - b).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn rejects_a_short_vector_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "1 3\na 1.0 2.0\n").unwrap();
        let err = load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::MalformedModel(_)));
    }
}
