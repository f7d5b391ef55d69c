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

use thiserror::Error;

/// Errors produced by vocabulary building, training, search, and model I/O.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("vocabulary is empty after applying the minimum frequency filter")]
    EmptyVocabulary,

    #[error("operation cancelled")]
    Cancelled,

    #[error("unknown word: '{0}'")]
    UnknownWord(String),

    #[error("malformed model file: {0}")]
    MalformedModel(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("JSON (de)serialization error")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
