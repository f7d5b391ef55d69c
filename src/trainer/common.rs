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

//! Scaffolding shared by the CBOW and Skip-gram workers: the sigmoid
//! lookup table, the linear-congruential PRNG, the lock-free shared
//! weight matrices, and the negative-sampling update rule.

pub const EXP_TABLE_SIZE: usize = 1000;
pub const MAX_EXP: f32 = 6.0;

/// Precomputes `sigma(x) = e^x / (e^x + 1)` over `x in [-MAX_EXP, MAX_EXP]`.
pub fn build_exp_table() -> Vec<f32> {
    (0..EXP_TABLE_SIZE)
        .map(|i| {
            let x = ((i as f32 / EXP_TABLE_SIZE as f32) * 2.0 - 1.0) * MAX_EXP;
            let e = (x as f64).exp();
            (e / (e + 1.0)) as f32
        })
        .collect()
}

#[inline]
fn exp_table_index(f: f32) -> usize {
    let idx = ((f + MAX_EXP) * (EXP_TABLE_SIZE as f32 / MAX_EXP / 2.0)) as usize;
    idx.min(EXP_TABLE_SIZE - 1)
}

/// Hierarchical-softmax activation: `None` means the bit is skipped
/// because `|f| >= MAX_EXP`.
#[inline]
pub fn hs_activation(exp_table: &[f32], f: f32) -> Option<f32> {
    if f.abs() >= MAX_EXP {
        None
    } else {
        Some(exp_table[exp_table_index(f)])
    }
}

/// Negative-sampling activation: saturates at the table boundary instead
/// of skipping.
#[inline]
pub fn neg_activation(exp_table: &[f32], f: f32) -> f32 {
    if f > MAX_EXP {
        1.0
    } else if f < -MAX_EXP {
        0.0
    } else {
        exp_table[exp_table_index(f)]
    }
}

/// `r <- r * 25214903917 + 11`, wrapping 64-bit.
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Rng { state: seed }
    }

    #[inline]
    pub fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(25214903917).wrapping_add(11);
        self.state
    }
}

/// A `vocab_size x layer_size` row-major matrix shared, unsynchronized,
/// across worker threads. Rows are handed out as raw-pointer-derived
/// mutable slices: concurrent writes to the same row may lose updates,
/// which is the accepted Hogwild!-style relaxation of parallel SGD (the
/// only synchronized datum across workers is the actual-word-count).
pub struct SharedMatrix {
    data: Vec<f32>,
    cols: usize,
}

impl SharedMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        SharedMatrix {
            data: vec![0.0; rows * cols],
            cols,
        }
    }

    pub fn from_vec(data: Vec<f32>, cols: usize) -> Self {
        assert_eq!(data.len() % cols, 0);
        SharedMatrix { data, cols }
    }

    #[inline]
    pub fn row(&self, idx: usize) -> &[f32] {
        &self.data[idx * self.cols..(idx + 1) * self.cols]
    }

    /// # Safety
    /// The caller must ensure no other live reference (mutable or not)
    /// to the same row outlives this one in a way that would violate
    /// Rust's aliasing model beyond the accepted Hogwild! relaxation;
    /// in practice this means: never call this from outside a training
    /// worker thread while the matrix is still shared.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn row_mut(&self, idx: usize) -> &mut [f32] {
        let ptr = self.data.as_ptr().add(idx * self.cols) as *mut f32;
        unsafe { std::slice::from_raw_parts_mut(ptr, self.cols) }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.clone()
    }
}

#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).fold(0.0, |acc, (x, y)| acc + x * y)
}

/// Shared implementation of spec 4.4.9: draws `negative_samples` extra
/// targets from the unigram table (plus the positive target at `d = 0`)
/// and accumulates the gradient into `neu1e`.
///
/// `neu1` is read both as the dot-product operand and as the vector used
/// to update `syn1neg` rows; callers that need the buggy, bit-for-bit
/// preserved Skip-gram behavior (see the open question in the design
/// notes) pass a buffer that is never otherwise written, which makes
/// every negative-sampling update here a no-op by construction.
#[allow(clippy::too_many_arguments)]
pub fn negative_sampling_update(
    neu1: &[f32],
    neu1e: &mut [f32],
    syn1neg: &SharedMatrix,
    unigram: &crate::unigram::UnigramTable,
    positive_target: u32,
    negative_samples: u32,
    alpha: f32,
    exp_table: &[f32],
    rng: &mut Rng,
) {
    let vocab_size = syn1neg.data.len() / syn1neg.cols;
    for d in 0..=negative_samples {
        let (target, label) = if d == 0 {
            (positive_target, 1.0f32)
        } else {
            let mut candidate = unigram.sample(rng.next());
            if candidate == 0 {
                let r = rng.next();
                candidate = (((r as usize % (vocab_size - 1)) + (vocab_size - 1)) % (vocab_size - 1)) as u32 + 1;
            }
            if candidate == positive_target {
                continue;
            }
            (candidate, 0.0f32)
        };

        let syn1neg_row = syn1neg.row(target as usize);
        let f = dot(neu1, syn1neg_row);
        let g = (label - neg_activation(exp_table, f)) * alpha;

        for (e, &w) in neu1e.iter_mut().zip(syn1neg_row) {
            *e += g * w;
        }

        let syn1neg_row_mut = unsafe { syn1neg.row_mut(target as usize) };
        for (w, &n) in syn1neg_row_mut.iter_mut().zip(neu1) {
            *w += g * n;
        }
    }
}

/// Shared implementation of hierarchical softmax: walks `node`'s root-to-leaf
/// path through `syn1`, accumulating the gradient into `neu1e` and updating
/// `syn1` in place. `input` is the hidden-layer vector: the averaged context
/// for CBOW, or the center word's own `syn0` row for Skip-gram.
pub fn hierarchical_softmax_update(
    input: &[f32],
    neu1e: &mut [f32],
    syn1: &SharedMatrix,
    node: &crate::huffman::HuffmanNode,
    alpha: f32,
    exp_table: &[f32],
) {
    for d in 0..node.code_len() {
        let point = node.point[d] as usize;
        let syn1_row = syn1.row(point);
        let f = dot(input, syn1_row);
        let Some(activation) = hs_activation(exp_table, f) else {
            continue;
        };
        let g = (1.0 - node.code[d] as f32 - activation) * alpha;

        for (e, &w) in neu1e.iter_mut().zip(syn1_row) {
            *e += g * w;
        }

        let syn1_row_mut = unsafe { syn1.row_mut(point) };
        for (w, &n) in syn1_row_mut.iter_mut().zip(input) {
            *w += g * n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_table_is_monotonic() {
        let table = build_exp_table();
        for w in table.windows(2) {
            assert!(w[1] >= w[0]);
        }
        assert!(table[0] > 0.0 && table[0] < 0.01);
        assert!(table[EXP_TABLE_SIZE - 1] < 1.0 && table[EXP_TABLE_SIZE - 1] > 0.99);
    }

    #[test]
    fn hs_activation_skips_outside_range() {
        let table = build_exp_table();
        assert!(hs_activation(&table, 7.0).is_none());
        assert!(hs_activation(&table, -7.0).is_none());
        assert!(hs_activation(&table, 0.0).is_some());
    }

    #[test]
    fn neg_activation_saturates() {
        let table = build_exp_table();
        assert_eq!(neg_activation(&table, 7.0), 1.0);
        assert_eq!(neg_activation(&table, -7.0), 0.0);
    }

    #[test]
    fn rng_sequence_is_deterministic() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(1);
        for _ in 0..10 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn shared_matrix_row_mut_is_visible_through_row() {
        let m = SharedMatrix::zeros(3, 4);
        unsafe {
            m.row_mut(1)[2] = 9.0;
        }
        assert_eq!(m.row(1)[2], 9.0);
    }

    #[test]
    fn hierarchical_softmax_update_moves_weights_toward_code() {
        use crate::huffman::HuffmanNode;

        let exp_table = build_exp_table();
        let syn1 = SharedMatrix::zeros(2, 4);
        let input = vec![1.0, 0.0, 0.0, 0.0];
        let mut neu1e = vec![0.0; 4];
        let node = HuffmanNode {
            idx: 0,
            code: vec![1],
            point: vec![0, 1],
        };

        hierarchical_softmax_update(&input, &mut neu1e, &syn1, &node, 0.1, &exp_table);

        // code[0] == 1 means label 0: the row's weight on the active input
        // dimension should move negative.
        assert!(syn1.row(0)[0] < 0.0);
        assert_ne!(neu1e[0], 0.0);
    }
}
