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

//! Linear-time Huffman tree construction over a frequency-descending
//! sorted vocabulary, as used by hierarchical softmax.
//!
//! The tree is represented as three flat parallel arrays (`count`,
//! `binary`, `parent`) indexed by integer node id, rather than as a
//! pointer graph. There are `2 * vocab_size - 1` nodes: the first
//! `vocab_size` are leaves (one per vocabulary entry, in the vocabulary's
//! own order), the rest are internal nodes created during construction.
//! The root is node `2 * vocab_size - 2`.

use crate::progress::{CancellationToken, ProgressEvent, ProgressListener, ProgressStage};
use crate::vocab::Vocabulary;

/// One leaf's Huffman code and the path of internal-node indices leading
/// to it from the root.
#[derive(Debug, Clone)]
pub struct HuffmanNode {
    /// Index of this token in the vocabulary.
    pub idx: usize,
    /// The code, read root-to-leaf: `code[d]` is the bit chosen at depth
    /// `d`. Length `code_len`.
    pub code: Vec<u8>,
    /// Internal-node indices (0-based in internal-node space, i.e. already
    /// offset by `-vocab_size`) visited root-to-leaf. `point[0]` is always
    /// the root (`vocab_size - 2`). Length `code_len + 1`; the last entry
    /// is never consulted during training (kept only for structural
    /// fidelity with the reference layout).
    pub point: Vec<u32>,
}

impl HuffmanNode {
    pub fn code_len(&self) -> usize {
        self.code.len()
    }
}

/// Builds Huffman codes for every token in `vocab`.
///
/// `vocab` must be sorted by count descending (as [`Vocabulary`] already
/// guarantees). Emits progress roughly every 1,000 tokens during both the
/// tree-construction and code-emission passes, and checks `cancel` at the
/// same boundaries.
pub fn encode(
    vocab: &Vocabulary,
    progress: &dyn ProgressListener,
    cancel: &CancellationToken,
) -> Result<Vec<HuffmanNode>, crate::error::Error> {
    let vocab_size = vocab.len();
    assert!(vocab_size >= 1, "huffman::encode requires a non-empty vocabulary");

    if vocab_size == 1 {
        // A single-token vocabulary has no internal nodes and a trivial,
        // zero-length code.
        return Ok(vec![HuffmanNode {
            idx: 0,
            code: Vec::new(),
            point: vec![0],
        }]);
    }

    let node_count = vocab_size * 2 - 1;
    let mut count: Vec<u64> = Vec::with_capacity(node_count);
    count.extend(vocab.entries().iter().map(|e| e.count as u64));
    count.resize(node_count, u64::MAX);

    let mut binary: Vec<u8> = vec![0; node_count];
    let mut parent: Vec<u32> = vec![0; node_count];

    let mut pos1: isize = vocab_size as isize - 1;
    let mut pos2: isize = vocab_size as isize;

    let report_every = 1000;

    for a in 0..vocab_size - 1 {
        let min1: usize = if pos1 >= 0 && count[pos1 as usize] < count[pos2 as usize] {
            let i = pos1 as usize;
            pos1 -= 1;
            i
        } else {
            let i = pos2 as usize;
            pos2 += 1;
            i
        };

        let min2: usize = if pos1 >= 0 && count[pos1 as usize] < count[pos2 as usize] {
            let i = pos1 as usize;
            pos1 -= 1;
            i
        } else {
            let i = pos2 as usize;
            pos2 += 1;
            i
        };

        count[vocab_size + a] = count[min1] + count[min2];
        parent[min1] = (vocab_size + a) as u32;
        parent[min2] = (vocab_size + a) as u32;
        binary[min2] = 1;

        if a % report_every == 0 {
            if cancel.is_cancelled() {
                return Err(crate::error::Error::Cancelled);
            }
            progress.on_progress(ProgressEvent {
                stage: ProgressStage::CreateHuffmanEncoding,
                fraction: (a as f64 / (vocab_size - 1) as f64) * 0.5,
            });
        }
    }

    let root = (vocab_size * 2 - 2) as u32;
    let mut nodes = Vec::with_capacity(vocab_size);

    for leaf in 0..vocab_size {
        let mut code: Vec<u8> = Vec::new();
        let mut collected: Vec<u32> = Vec::new();
        let mut b = leaf as u32;
        loop {
            code.push(binary[b as usize]);
            collected.push(b);
            b = parent[b as usize];
            if b == root {
                break;
            }
        }
        let code_len = code.len();

        let mut final_code = vec![0u8; code_len];
        let mut point = vec![0u32; code_len + 1];
        point[0] = vocab_size as u32 - 2;
        for (i, (&c, &collected_b)) in code.iter().zip(collected.iter()).enumerate() {
            final_code[code_len - i - 1] = c;
            point[code_len - i] = collected_b.wrapping_sub(vocab_size as u32);
        }

        nodes.push(HuffmanNode {
            idx: leaf,
            code: final_code,
            point,
        });

        if leaf % report_every == 0 {
            if cancel.is_cancelled() {
                return Err(crate::error::Error::Cancelled);
            }
            progress.on_progress(ProgressEvent {
                stage: ProgressStage::CreateHuffmanEncoding,
                fraction: 0.5 + (leaf as f64 / vocab_size as f64) * 0.5,
            });
        }
    }

    Ok(nodes)
}
