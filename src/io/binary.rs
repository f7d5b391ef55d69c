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

//! The binary model format: a text header line (`<vocab_size>
//! <layer_size>`), then one record per vocabulary entry consisting of the
//! token as UTF-8 text, a single space, `layer_size` raw `f32` values, and
//! a trailing newline. Unlike the reference implementation (which writes
//! the host's native byte order via a raw transmute), the byte order here
//! is an explicit, caller-chosen parameter so a file written on one
//! architecture loads correctly on another.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};

use crate::error::{Error, Result};
use crate::model::Model;
use crate::vocab::{VocabEntry, Vocabulary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn write_f32(self, w: &mut impl Write, v: f32) -> std::io::Result<()> {
        let bytes = match self {
            ByteOrder::Little => v.to_le_bytes(),
            ByteOrder::Big => v.to_be_bytes(),
        };
        w.write_all(&bytes)
    }

    fn read_f32(self, bytes: [u8; 4]) -> f32 {
        match self {
            ByteOrder::Little => f32::from_le_bytes(bytes),
            ByteOrder::Big => f32::from_be_bytes(bytes),
        }
    }
}

pub fn save(model: &Model, path: &str, byte_order: ByteOrder) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{} {}", model.len(), model.layer_size())?;
    for (idx, entry) in model.vocab().entries().iter().enumerate() {
        write!(writer, "{} ", entry.token)?;
        for &v in model.vector(idx) {
            byte_order.write_f32(&mut writer, v)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn load(path: &str, byte_order: ByteOrder) -> Result<Model> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut header = String::new();
    reader.read_line(&mut header)?;
    let mut header_parts = header.split_whitespace();
    let (Some(vocab_size_str), Some(layer_size_str)) = (header_parts.next(), header_parts.next()) else {
        return Err(Error::MalformedModel(format!("invalid header: '{}'", header.trim_end())));
    };
    let vocab_size: usize = vocab_size_str
        .parse()
        .map_err(|_| Error::MalformedModel(format!("invalid vocab size: '{vocab_size_str}'")))?;
    let layer_size: usize = layer_size_str
        .parse()
        .map_err(|_| Error::MalformedModel(format!("invalid layer size: '{layer_size_str}'")))?;

    let mut entries = Vec::with_capacity(vocab_size);
    let mut vectors = Vec::with_capacity(vocab_size * layer_size);

    for _ in 0..vocab_size {
        let mut token_bytes = Vec::new();
        let n = reader.read_until(b' ', &mut token_bytes)?;
        if n == 0 {
            return Err(Error::MalformedModel("unexpected end of file reading token".into()));
        }
        token_bytes.pop(); // trailing space
        let token = String::from_utf8(token_bytes)
            .map_err(|_| Error::MalformedModel("token is not valid UTF-8".into()))?;

        let mut vector_bytes = vec![0u8; layer_size * 4];
        reader.read_exact(&mut vector_bytes)?;
        for chunk in vector_bytes.chunks_exact(4) {
            let bytes: [u8; 4] = chunk.try_into().unwrap();
            vectors.push(byte_order.read_f32(bytes));
        }

        // The trailing newline is tolerated when present but not required:
        // a writer may omit it after the last record.
        let buf = reader.fill_buf()?;
        if buf.first() == Some(&b'\n') {
            reader.consume(1);
        }

        entries.push(VocabEntry { token, count: 1 });
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
        Model::new(vocab, 3, vec![1.5, -2.25, 3.0, 0.0, 4.5, -9.0])
    }

    #[test]
    fn round_trips_little_endian() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let path = path.to_str().unwrap();

        let model = sample_model();
        save(&model, path, ByteOrder::Little).unwrap();
        let loaded = load(path, ByteOrder::Little).unwrap();

        assert_eq!(loaded.vector_for("a").unwrap(), model.vector_for("a").unwrap());
        assert_eq!(loaded.vector_for("b").unwrap(), model.vector_for("b").unwrap());
    }

    #[test]
    fn round_trips_big_endian() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let path = path.to_str().unwrap();

        let model = sample_model();
        save(&model, path, ByteOrder::Big).unwrap();
        let loaded = load(path, ByteOrder::Big).unwrap();

        assert_eq!(loaded.vector_for("a").unwrap(), model.vector_for("a").unwrap());
    }

    #[test]
    fn missing_trailing_newline_on_last_record_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let path = path.to_str().unwrap();

        let model = sample_model();
        save(&model, path, ByteOrder::Little).unwrap();
        let mut bytes = std::fs::read(path).unwrap();
        assert_eq!(bytes.pop(), Some(b'\n'));
        std::fs::write(path, &bytes).unwrap();

        let loaded = load(path, ByteOrder::Little).unwrap();
        assert_eq!(loaded.vector_for("a").unwrap(), model.vector_for("a").unwrap());
        assert_eq!(loaded.vector_for("b").unwrap(), model.vector_for("b").unwrap());
    }

    #[test]
    fn mismatched_byte_order_does_not_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let path = path.to_str().unwrap();

        let model = sample_model();
        save(&model, path, ByteOrder::Little).unwrap();
        let loaded = load(path, ByteOrder::Big).unwrap();

        assert_ne!(loaded.vector_for("a").unwrap(), model.vector_for("a").unwrap());
    }
}
