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

//! CBOW: predicts the center word from the average of its context window.

use super::common::{Rng, SharedMatrix, hierarchical_softmax_update, negative_sampling_update};
use super::{Buffers, TrainCtx};
use crate::huffman::HuffmanNode;

/// Trains one position of `sentence` (the word at `pos`) against its
/// surrounding window, shrunk by a random amount `b` in `[0, window)` as in
/// the reference implementation.
#[allow(clippy::too_many_arguments)]
pub fn train_position(
    ctx: &TrainCtx,
    sentence: &[u32],
    pos: usize,
    rng: &mut Rng,
    alpha: f32,
    buffers: &mut Buffers,
) {
    let window = ctx.config.window_size;
    let b = (rng.next() as usize) % window;

    buffers.neu1.fill(0.0);
    let mut cw: usize = 0;

    for a in b..2 * window + 1 - b {
        if a == window {
            continue;
        }
        let c = pos as isize - window as isize + a as isize;
        if c < 0 || c as usize >= sentence.len() {
            continue;
        }
        let context_word = sentence[c as usize] as usize;
        let row = ctx.net.syn0.row(context_word);
        for (s, &w) in buffers.neu1.iter_mut().zip(row) {
            *s += w;
        }
        cw += 1;
    }

    if cw == 0 {
        return;
    }

    for v in buffers.neu1.iter_mut() {
        *v /= cw as f32;
    }
    buffers.neu1e.fill(0.0);

    let word = sentence[pos] as usize;

    if let Some(syn1) = &ctx.net.syn1 {
        let node: &HuffmanNode = &ctx.huffman[word];
        hierarchical_softmax_update(
            &buffers.neu1,
            &mut buffers.neu1e,
            syn1,
            node,
            alpha,
            ctx.exp_table,
        );
    }

    if let Some(syn1neg) = &ctx.net.syn1neg {
        negative_sampling_update(
            &buffers.neu1,
            &mut buffers.neu1e,
            syn1neg,
            ctx.unigram.expect("negative sampling requires a unigram table"),
            word as u32,
            ctx.config.negative_samples,
            alpha,
            ctx.exp_table,
            rng,
        );
    }

    for a in b..2 * window + 1 - b {
        if a == window {
            continue;
        }
        let c = pos as isize - window as isize + a as isize;
        if c < 0 || c as usize >= sentence.len() {
            continue;
        }
        let context_word = sentence[c as usize] as usize;
        apply_gradient(&ctx.net.syn0, context_word, &buffers.neu1e);
    }
}

fn apply_gradient(syn0: &SharedMatrix, row_idx: usize, neu1e: &[f32]) {
    let row = unsafe { syn0.row_mut(row_idx) };
    for (w, &e) in row.iter_mut().zip(neu1e) {
        *w += e;
    }
}
