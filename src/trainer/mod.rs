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

//! The parallel neural-network trainer: weight matrices, the Hogwild!
//! worker pool, and CBOW / Skip-gram dispatch.

pub mod common;
mod cbow;
mod skipgram;

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use log::{debug, info};

use crate::config::{TrainingConfig, TrainingType};
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::huffman::{self, HuffmanNode};
use crate::model::Model;
use crate::progress::{CancellationToken, ProgressEvent, ProgressListener, ProgressStage};
use crate::unigram::UnigramTable;
use crate::vocab::Vocabulary;

use common::{Rng, SharedMatrix, build_exp_table};

/// The trainer's weight matrices: the shared input/embedding vectors
/// (`syn0`), plus whichever of the hierarchical-softmax (`syn1`) and
/// negative-sampling (`syn1neg`) output matrices the configuration enables.
/// All three are updated without synchronization across worker threads
/// (Hogwild!); the only coordinated value is the actual word count used to
/// schedule the learning-rate decay.
pub struct NeuralNet {
    layer_size: usize,
    syn0: SharedMatrix,
    syn1: Option<SharedMatrix>,
    syn1neg: Option<SharedMatrix>,
}

impl NeuralNet {
    pub fn new(vocab_size: usize, layer_size: usize, config: &TrainingConfig) -> NeuralNet {
        NeuralNet {
            layer_size,
            syn0: Self::init_syn0(vocab_size, layer_size),
            syn1: if config.use_hierarchical_softmax {
                Some(SharedMatrix::zeros(vocab_size, layer_size))
            } else {
                None
            },
            syn1neg: if config.negative_samples > 0 {
                Some(SharedMatrix::zeros(vocab_size, layer_size))
            } else {
                None
            },
        }
    }

    /// Initializes `syn0` with the same fixed seed and scaling the
    /// reference implementation uses, so that training runs are
    /// reproducible given the same configuration and corpus: each weight
    /// is drawn uniformly from `[-0.5 / L, 0.5 / L]`. One extra PRNG draw
    /// is consumed per row before its `layer_size` draws, reserving the
    /// randomness slot the reference implementation spent on the
    /// end-of-sentence sentinel this vocabulary never materializes.
    fn init_syn0(vocab_size: usize, layer_size: usize) -> SharedMatrix {
        let mut rng = Rng::new(1);
        let mut data = vec![0f32; vocab_size * layer_size];
        for row in data.chunks_mut(layer_size) {
            rng.next();
            for w in row.iter_mut() {
                let r = rng.next();
                *w = ((r & 0xffff) as f32 / 65536.0 - 0.5) / layer_size as f32;
            }
        }
        SharedMatrix::from_vec(data, layer_size)
    }

    pub fn layer_size(&self) -> usize {
        self.layer_size
    }
}

/// Per-thread scratch buffers, reused across every position in every
/// sentence a worker trains on.
struct Buffers {
    neu1: Vec<f32>,
    neu1e: Vec<f32>,
    /// Never written to; passed as the "hidden vector" to Skip-gram's
    /// negative-sampling update to reproduce the reference implementation's
    /// no-op behavior there (see [`skipgram`]).
    zero: Vec<f32>,
}

impl Buffers {
    fn new(layer_size: usize) -> Buffers {
        Buffers {
            neu1: vec![0.0; layer_size],
            neu1e: vec![0.0; layer_size],
            zero: vec![0.0; layer_size],
        }
    }
}

/// Read-only state shared by every worker thread for the duration of a
/// training run.
struct TrainCtx<'a> {
    vocab: &'a Vocabulary,
    huffman: &'a [HuffmanNode],
    unigram: Option<&'a UnigramTable>,
    exp_table: &'a [f32],
    config: &'a TrainingConfig,
    net: &'a NeuralNet,
    actual_word_count: &'a AtomicU64,
    num_trained_tokens: u64,
    progress: &'a dyn ProgressListener,
    cancel: &'a CancellationToken,
}

/// Trains a [`Model`] from `corpus` against `vocab`, per `config`.
///
/// Builds the Huffman encoding (if hierarchical softmax is enabled) and
/// the unigram sampling table (if negative sampling is enabled), then
/// spawns `config.num_threads` worker threads over `thread::scope`, each
/// training its own contiguous batch of the corpus for `config.iterations`
/// passes. Weight matrix updates are unsynchronized Hogwild!-style writes;
/// the only atomic state shared across threads is the actual word count
/// used to schedule the linear learning-rate decay.
pub fn train(
    vocab: &Vocabulary,
    corpus: &Corpus,
    config: &TrainingConfig,
    progress: &dyn ProgressListener,
    cancel: &CancellationToken,
) -> Result<Model> {
    let huffman_nodes = if config.use_hierarchical_softmax {
        huffman::encode(vocab, progress, cancel)?
    } else {
        Vec::new()
    };
    let unigram = if config.negative_samples > 0 {
        Some(UnigramTable::build(vocab))
    } else {
        None
    };
    let exp_table = build_exp_table();
    let net = NeuralNet::new(vocab.len(), config.layer_size, config);
    let actual_word_count = AtomicU64::new(0);

    let ctx = TrainCtx {
        vocab,
        huffman: &huffman_nodes,
        unigram: unigram.as_ref(),
        exp_table: &exp_table,
        config,
        net: &net,
        actual_word_count: &actual_word_count,
        num_trained_tokens: corpus.num_trained_tokens(),
        progress,
        cancel,
    };

    let batches = corpus.partition(config.num_threads);
    info!(
        "training {:?} over {} threads, {} iterations, vocab size {}",
        config.training_type,
        config.num_threads,
        config.iterations,
        vocab.len()
    );

    let result: std::result::Result<(), Error> = thread::scope(|scope| {
        let ctx = &ctx;
        let handles: Vec<_> = batches
            .into_iter()
            .enumerate()
            .map(|(thread_id, batch)| scope.spawn(move || run_worker(ctx, thread_id, batch)))
            .collect();

        for handle in handles {
            handle.join().expect("training worker panicked")?;
        }
        Ok(())
    });
    result?;

    progress.on_progress(ProgressEvent {
        stage: ProgressStage::TrainNeuralNetwork,
        fraction: 1.0,
    });

    Ok(Model::new(vocab.clone(), config.layer_size, net.syn0.into_vec()))
}

/// Runs one worker thread's share of training: repeated passes over
/// `batch`, with per-sentence subsampling, a moving learning rate, and a
/// dispatch to [`cbow::train_position`] or [`skipgram::train_position`]
/// at each surviving sentence position.
fn run_worker(ctx: &TrainCtx, thread_id: usize, batch: &[Vec<u32>]) -> Result<()> {
    let mut rng = Rng::new(thread_id as u64);
    let mut buffers = Buffers::new(ctx.net.layer_size);
    let mut alpha = ctx.config.initial_learning_rate;
    let mut word_count: u64 = 0;
    let mut last_word_count: u64 = 0;
    let denom = (ctx.config.iterations * ctx.num_trained_tokens.max(1) + 1) as f64;

    for _ in 0..ctx.config.iterations {
        for chunk in batch {
            if ctx.cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let sentence = subsample(ctx, chunk, &mut rng);
            word_count += chunk.len() as u64 + 1;

            if word_count - last_word_count > 10_000 {
                let delta = word_count - last_word_count;
                ctx.actual_word_count.fetch_add(delta, Ordering::SeqCst);
                last_word_count = word_count;

                let total = ctx.actual_word_count.load(Ordering::SeqCst) as f64;
                alpha = (ctx.config.initial_learning_rate as f64 * (1.0 - total / denom)) as f32;
                alpha = alpha.max(ctx.config.initial_learning_rate * 0.0001);

                ctx.progress.on_progress(ProgressEvent {
                    stage: ProgressStage::TrainNeuralNetwork,
                    fraction: (total / denom).clamp(0.0, 1.0),
                });
                debug!("thread {thread_id}: alpha={alpha:.6} progress={:.2}%", total / denom * 100.0);
            }

            for pos in 0..sentence.len() {
                match ctx.config.training_type {
                    TrainingType::Cbow => {
                        cbow::train_position(ctx, &sentence, pos, &mut rng, alpha, &mut buffers)
                    }
                    TrainingType::SkipGram => {
                        skipgram::train_position(ctx, &sentence, pos, &mut rng, alpha, &mut buffers)
                    }
                }
            }
        }
    }

    ctx.actual_word_count
        .fetch_add(word_count - last_word_count, Ordering::SeqCst);
    Ok(())
}

/// Applies frequent-word subsampling: each token is kept with probability
/// `(sqrt(count / (t * N)) + 1) * (t * N) / count`, where `N` is the
/// corpus's total trained-token count and `t` is
/// `config.down_sample_rate`. A `down_sample_rate` of `0` disables
/// subsampling entirely.
fn subsample(ctx: &TrainCtx, chunk: &[u32], rng: &mut Rng) -> Vec<u32> {
    if ctx.config.down_sample_rate <= 0.0 {
        return chunk.to_vec();
    }
    let t = ctx.config.down_sample_rate;
    let n = ctx.num_trained_tokens.max(1) as f64;

    chunk
        .iter()
        .copied()
        .filter(|&w| {
            let count = ctx.vocab.count(w as usize) as f64;
            let ratio = count / (t * n);
            let keep_prob = (ratio.sqrt() + 1.0) * (t * n) / count;
            let r = rng.next();
            keep_prob >= (r & 0xffff) as f64 / 65536.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingType;
    use crate::progress::NullProgressListener;
    use std::collections::HashMap;

    fn vocab_and_corpus() -> (Vocabulary, Corpus) {
        let counts: HashMap<String, u32> = [("a", 20), ("b", 15), ("c", 10), ("d", 5)]
            .iter()
            .map(|(w, c)| (w.to_string(), *c))
            .collect();
        let vocab = Vocabulary::from_counts(counts, 0).unwrap();
        let sentences: Vec<Vec<&str>> = (0..20).map(|_| vec!["a", "b", "c", "d", "a", "b"]).collect();
        let corpus = Corpus::prepare(sentences, &vocab);
        (vocab, corpus)
    }

    #[test]
    fn training_produces_a_model_with_the_right_shape() {
        let (vocab, corpus) = vocab_and_corpus();
        let config = TrainingConfig::builder(TrainingType::Cbow)
            .layer_size(8)
            .window_size(2)
            .num_threads(2)
            .iterations(1)
            .negative_samples(2)
            .down_sample_rate(0.0)
            .build()
            .unwrap();
        let model = train(&vocab, &corpus, &config, &NullProgressListener, &CancellationToken::new()).unwrap();
        assert_eq!(model.len(), vocab.len());
        assert_eq!(model.layer_size(), 8);
        assert_eq!(model.vector(0).len(), 8);
    }

    #[test]
    fn skip_gram_training_also_produces_a_model() {
        let (vocab, corpus) = vocab_and_corpus();
        let config = TrainingConfig::builder(TrainingType::SkipGram)
            .layer_size(6)
            .window_size(2)
            .num_threads(1)
            .iterations(1)
            .use_hierarchical_softmax(true)
            .down_sample_rate(0.0)
            .build()
            .unwrap();
        let model = train(&vocab, &corpus, &config, &NullProgressListener, &CancellationToken::new()).unwrap();
        assert_eq!(model.len(), vocab.len());
    }

    #[test]
    fn cancellation_stops_training_early() {
        let (vocab, corpus) = vocab_and_corpus();
        let config = TrainingConfig::builder(TrainingType::Cbow)
            .layer_size(4)
            .num_threads(1)
            .iterations(1)
            .negative_samples(2)
            .build()
            .unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = train(&vocab, &corpus, &config, &NullProgressListener, &cancel).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
