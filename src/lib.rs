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

//! A parallel word2vec (CBOW / Skip-gram) trainer and a nearest-neighbor /
//! analogy search service over the resulting embeddings.
//!
//! The pipeline, end to end:
//!
//! 1. [`vocab`] builds a deterministic, frequency-sorted vocabulary from a
//!    stream of tokenized sentences.
//! 2. [`corpus`] resolves that vocabulary against the same sentences,
//!    dropping out-of-vocabulary tokens and chunking long sentences.
//! 3. [`huffman`] (for hierarchical softmax) and [`unigram`] (for negative
//!    sampling) build the auxiliary structures the trainer needs.
//! 4. [`trainer`] runs the Hogwild!-style parallel SGD loop and produces a
//!    [`model::Model`].
//! 5. [`search`] answers nearest-neighbor and analogy queries against a
//!    normalized model, and [`io`] persists/loads models in text, binary,
//!    or JSON form.

pub mod config;
pub mod corpus;
pub mod error;
pub mod huffman;
pub mod io;
pub mod model;
pub mod progress;
pub mod search;
pub mod trainer;
pub mod unigram;
pub mod vocab;

pub use config::{TrainingConfig, TrainingConfigBuilder, TrainingType};
pub use error::{Error, Result};
pub use model::{Model, NormalizedModel};
pub use progress::{CancellationToken, ProgressEvent, ProgressListener, ProgressStage};
pub use search::{Neighbor, Searcher, SemanticDifference};
