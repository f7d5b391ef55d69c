//  Copyright 2026 Robert Zavalczki
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

//! Progress reporting and cooperative cancellation for the preparation
//! pipeline and the trainer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The stage a [`ProgressEvent`] was emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    AcquireVocab,
    FilterSortVocab,
    CreateHuffmanEncoding,
    TrainNeuralNetwork,
}

/// A single progress notification. `fraction` is in `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent {
    pub stage: ProgressStage,
    pub fraction: f64,
}

/// Observer interface for progress reporting. The default implementation
/// does nothing, so callers that don't care about progress pay nothing.
pub trait ProgressListener: Send + Sync {
    fn on_progress(&self, event: ProgressEvent);
}

/// A listener that discards every event.
pub struct NullProgressListener;

impl ProgressListener for NullProgressListener {
    fn on_progress(&self, _event: ProgressEvent) {}
}

/// A cheap, cloneable handle used to request cancellation of a running
/// vocabulary build, Huffman encoding, or training run. Checked
/// cooperatively at chunk boundaries; never interrupts in-flight work.
#[derive(Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
