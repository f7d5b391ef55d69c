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

//! Command-line front end: train a model from a text corpus, or query an
//! already-trained one.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use word2vec_rs::config::{TrainingConfig, TrainingType};
use word2vec_rs::corpus::Corpus;
use word2vec_rs::io::{binary, serde_model, text};
use word2vec_rs::model::{Model, NormalizedModel};
use word2vec_rs::progress::{CancellationToken, NullProgressListener};
use word2vec_rs::search::Searcher;
use word2vec_rs::trainer;
use word2vec_rs::vocab::Vocabulary;

#[derive(Parser)]
#[command(name = "word2vec-rs", version, about = "Train and query word2vec-style embeddings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ModelFormatArg {
    Text,
    Binary,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TrainingTypeArg {
    Cbow,
    SkipGram,
}

#[derive(Subcommand)]
enum Command {
    /// Train a model from a whitespace-tokenized, one-sentence-per-line corpus.
    Train {
        /// Path to the training corpus (one sentence per line).
        #[arg(short = 't', long)]
        train: String,

        /// Path to write the trained model to.
        #[arg(short = 'o', long)]
        output: String,

        /// On-disk format of the output model.
        #[arg(long, value_enum, default_value_t = ModelFormatArg::Text)]
        format: ModelFormatArg,

        /// CBOW or Skip-gram.
        #[arg(long, value_enum, default_value_t = TrainingTypeArg::Cbow)]
        model: TrainingTypeArg,

        /// Embedding dimensionality.
        #[arg(short = 's', long, default_value_t = 100)]
        size: usize,

        /// Context window size.
        #[arg(short = 'w', long, default_value_t = 5)]
        window: usize,

        /// Number of negative samples per positive example (0 disables negative sampling).
        #[arg(long, default_value_t = 5)]
        negative: u32,

        /// Enable hierarchical softmax.
        #[arg(long, default_value_t = false)]
        hs: bool,

        /// Number of training threads.
        #[arg(long)]
        threads: Option<usize>,

        /// Number of passes over the corpus.
        #[arg(long, default_value_t = 5)]
        iter: u64,

        /// Discard words occurring fewer than this many times.
        #[arg(long, default_value_t = 5)]
        min_count: u32,

        /// Frequent-word subsampling threshold (0 disables subsampling).
        #[arg(long, default_value_t = 1e-3)]
        sample: f64,
    },
    /// Print the `k` nearest neighbors of a word in a trained model.
    Nearest {
        /// Path to a trained model.
        #[arg(short = 'm', long)]
        model: String,
        /// On-disk format of the model.
        #[arg(long, value_enum, default_value_t = ModelFormatArg::Text)]
        format: ModelFormatArg,
        /// The query word.
        word: String,
        /// How many neighbors to print.
        #[arg(short = 'k', long, default_value_t = 10)]
        k: usize,
    },
    /// Print the `k` nearest neighbors of `a - b + c`.
    Analogy {
        #[arg(short = 'm', long)]
        model: String,
        #[arg(long, value_enum, default_value_t = ModelFormatArg::Text)]
        format: ModelFormatArg,
        a: String,
        b: String,
        c: String,
        #[arg(short = 'k', long, default_value_t = 10)]
        k: usize,
    },
}

fn read_sentences(path: &str) -> io::Result<Vec<Vec<String>>> {
    let reader = BufReader::new(File::open(path)?);
    reader
        .lines()
        .map(|line| line.map(|l| l.split_whitespace().map(str::to_string).collect()))
        .collect()
}

fn load_model(path: &str, format: ModelFormatArg) -> word2vec_rs::Result<Model> {
    match format {
        ModelFormatArg::Text => text::load(path),
        ModelFormatArg::Binary => binary::load(path, binary::ByteOrder::Little),
        ModelFormatArg::Json => serde_model::load(path),
    }
}

fn save_model(model: &Model, path: &str, format: ModelFormatArg) -> word2vec_rs::Result<()> {
    match format {
        ModelFormatArg::Text => text::save(model, path),
        ModelFormatArg::Binary => binary::save(model, path, binary::ByteOrder::Little),
        ModelFormatArg::Json => serde_model::save(model, path),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Train {
            train,
            output,
            format,
            model,
            size,
            window,
            negative,
            hs,
            threads,
            iter,
            min_count,
            sample,
        } => {
            let sentences = read_sentences(&train)?;
            info!("read {} sentences from '{train}'", sentences.len());

            let vocab = Vocabulary::build(sentences.iter().map(|s| s.iter().map(String::as_str)), min_count)?;
            info!("vocabulary size: {}", vocab.len());

            let corpus = Corpus::prepare(sentences.iter().map(|s| s.iter().map(String::as_str)), &vocab);

            let training_type = match model {
                TrainingTypeArg::Cbow => TrainingType::Cbow,
                TrainingTypeArg::SkipGram => TrainingType::SkipGram,
            };
            let mut builder = TrainingConfig::builder(training_type)
                .layer_size(size)
                .window_size(window)
                .negative_samples(negative)
                .use_hierarchical_softmax(hs)
                .iterations(iter)
                .down_sample_rate(sample);
            if let Some(threads) = threads {
                builder = builder.num_threads(threads);
            }
            let config = builder.build()?;

            let trained = trainer::train(&vocab, &corpus, &config, &NullProgressListener, &CancellationToken::new())?;
            save_model(&trained, &output, format)?;
            info!("wrote model to '{output}'");
        }
        Command::Nearest { model, format, word, k } => {
            let model = load_model(&model, format)?;
            let searcher = Searcher::new(NormalizedModel::from_model(model));
            for neighbor in searcher.get_matches(&word, k)? {
                println!("{}\t{:.4}", neighbor.token, neighbor.similarity);
            }
        }
        Command::Analogy { model, format, a, b, c, k } => {
            let model = load_model(&model, format)?;
            let searcher = Searcher::new(NormalizedModel::from_model(model));
            let diff = searcher.semantic_difference(&b, &c)?;
            for neighbor in diff.get_matches(&a, k)? {
                println!("{}\t{:.4}", neighbor.token, neighbor.similarity);
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
