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

//! Skip-gram: for each context word around the center word, trains that
//! context word's own vector to predict the center word.
//!
//! The negative-sampling half of this path is trained against a hidden
//! vector that is never written to (see [`Buffers::zero`]), reproducing a
//! known bug in the reference implementation this crate's behavior is
//! pinned to: the gradient contribution from negative sampling in
//! Skip-gram is always exactly zero, so only the hierarchical-softmax half
//! of Skip-gram training (when enabled) has any effect. This is documented
//! as an open design decision, not an oversight.

use super::common::{Rng, SharedMatrix, hierarchical_softmax_update, negative_sampling_update};
use super::{Buffers, TrainCtx};
use crate::huffman::HuffmanNode;

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
    let word = sentence[pos] as usize;
    let node: &HuffmanNode = &ctx.huffman[word];

    for a in b..2 * window + 1 - b {
        if a == window {
            continue;
        }
        let c = pos as isize - window as isize + a as isize;
        if c < 0 || c as usize >= sentence.len() {
            continue;
        }
        let context_word = sentence[c as usize] as usize;

        buffers.neu1e.fill(0.0);
        let input = ctx.net.syn0.row(context_word);

        if let Some(syn1) = &ctx.net.syn1 {
            hierarchical_softmax_update(input, &mut buffers.neu1e, syn1, node, alpha, ctx.exp_table);
        }

        if let Some(syn1neg) = &ctx.net.syn1neg {
            negative_sampling_update(
                &buffers.zero,
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

        apply_gradient(&ctx.net.syn0, context_word, &buffers.neu1e);
    }
}

fn apply_gradient(syn0: &SharedMatrix, row_idx: usize, neu1e: &[f32]) {
    let row = unsafe { syn0.row_mut(row_idx) };
    for (w, &e) in row.iter_mut().zip(neu1e) {
        *w += e;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TrainingConfig, TrainingType};
    use crate::huffman;
    use crate::progress::{CancellationToken, NullProgressListener};
    use crate::trainer::NeuralNet;
    use crate::unigram::UnigramTable;
    use crate::vocab::Vocabulary;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicU64;

    fn small_vocab() -> Vocabulary {
        let counts: HashMap<String, u32> = [("a", 10), ("b", 8), ("c", 6), ("d", 4), ("e", 2)]
            .iter()
            .map(|(w, c)| (w.to_string(), *c))
            .collect();
        Vocabulary::from_counts(counts, 0).unwrap()
    }

    fn make_ctx<'a>(
        vocab: &'a Vocabulary,
        huffman: &'a [HuffmanNode],
        unigram: &'a UnigramTable,
        exp_table: &'a [f32],
        config: &'a TrainingConfig,
        net: &'a NeuralNet,
        actual_word_count: &'a AtomicU64,
        cancel: &'a CancellationToken,
    ) -> TrainCtx<'a> {
        TrainCtx {
            vocab,
            huffman,
            unigram: Some(unigram),
            exp_table,
            config,
            net,
            actual_word_count,
            num_trained_tokens: 30,
            progress: &NullProgressListener,
            cancel,
        }
    }

    #[test]
    fn negative_sampling_alone_leaves_syn1neg_unchanged() {
        let vocab = small_vocab();
        let config = TrainingConfig::builder(TrainingType::SkipGram)
            .layer_size(4)
            .window_size(2)
            .negative_samples(3)
            .build()
            .unwrap();
        let net = NeuralNet::new(vocab.len(), config.layer_size, &config);
        let unigram = UnigramTable::build(&vocab);
        let exp_table = super::super::common::build_exp_table();
        let huffman = huffman::encode(&vocab, &NullProgressListener, &CancellationToken::new()).unwrap();
        let actual_word_count = AtomicU64::new(0);
        let cancel = CancellationToken::new();
        let ctx = make_ctx(
            &vocab,
            &huffman,
            &unigram,
            &exp_table,
            &config,
            &net,
            &actual_word_count,
            &cancel,
        );

        let syn1neg_before: Vec<f32> = net.syn1neg.as_ref().unwrap().to_vec();
        let sentence = vec![0u32, 1, 2, 3, 4];
        let mut rng = Rng::new(7);
        let mut buffers = Buffers::new(config.layer_size);
        train_position(&ctx, &sentence, 2, &mut rng, config.initial_learning_rate, &mut buffers);
        let syn1neg_after: Vec<f32> = net.syn1neg.as_ref().unwrap().to_vec();
        assert_eq!(syn1neg_before, syn1neg_after);
    }

    #[test]
    fn hierarchical_softmax_alone_moves_context_vectors() {
        let vocab = small_vocab();
        let config = TrainingConfig::builder(TrainingType::SkipGram)
            .layer_size(4)
            .window_size(2)
            .use_hierarchical_softmax(true)
            .build()
            .unwrap();
        let net = NeuralNet::new(vocab.len(), config.layer_size, &config);
        let unigram = UnigramTable::build(&vocab);
        let exp_table = super::super::common::build_exp_table();
        let huffman = huffman::encode(&vocab, &NullProgressListener, &CancellationToken::new()).unwrap();
        let actual_word_count = AtomicU64::new(0);
        let cancel = CancellationToken::new();
        let ctx = TrainCtx {
            vocab: &vocab,
            huffman: &huffman,
            unigram: None,
            exp_table: &exp_table,
            config: &config,
            net: &net,
            actual_word_count: &actual_word_count,
            num_trained_tokens: 30,
            progress: &NullProgressListener,
            cancel: &cancel,
        };

        let before: Vec<f32> = net.syn0.row(1).to_vec();
        let sentence = vec![0u32, 1, 2, 3, 4];
        let mut rng = Rng::new(7);
        let mut buffers = Buffers::new(config.layer_size);
        train_position(&ctx, &sentence, 2, &mut rng, config.initial_learning_rate, &mut buffers);
        let after: Vec<f32> = net.syn0.row(1).to_vec();
        assert_ne!(before, after);
    }
}
