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

//! Training configuration: the enumerated options of the neural network
//! trainer, validated eagerly by a fluent builder.

use crate::error::{Error, Result};

/// CBOW predicts a target from its averaged context; Skip-gram predicts
/// each context word from the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingType {
    Cbow,
    SkipGram,
}

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub training_type: TrainingType,
    pub layer_size: usize,
    pub window_size: usize,
    pub num_threads: usize,
    pub iterations: u64,
    pub negative_samples: u32,
    pub use_hierarchical_softmax: bool,
    pub down_sample_rate: f64,
    pub initial_learning_rate: f32,
}

impl TrainingConfig {
    pub fn builder(training_type: TrainingType) -> TrainingConfigBuilder {
        TrainingConfigBuilder::new(training_type)
    }
}

/// Fluent builder for [`TrainingConfig`]. Validation is eager and fatal:
/// every setter that receives an out-of-range value records an error that
/// `build()` surfaces as [`Error::InvalidConfig`].
pub struct TrainingConfigBuilder {
    training_type: TrainingType,
    layer_size: usize,
    window_size: usize,
    num_threads: usize,
    iterations: u64,
    negative_samples: u32,
    use_hierarchical_softmax: bool,
    down_sample_rate: f64,
    initial_learning_rate: Option<f32>,
    error: Option<String>,
}

impl TrainingConfigBuilder {
    pub fn new(training_type: TrainingType) -> Self {
        Self {
            training_type,
            layer_size: 100,
            window_size: 5,
            num_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            iterations: 5,
            negative_samples: 0,
            use_hierarchical_softmax: false,
            down_sample_rate: 1e-3,
            initial_learning_rate: None,
            error: None,
        }
    }

    fn fail(&mut self, msg: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(msg.into());
        }
    }

    pub fn layer_size(mut self, value: usize) -> Self {
        if value == 0 {
            self.fail("layer_size must be > 0");
        }
        self.layer_size = value;
        self
    }

    pub fn window_size(mut self, value: usize) -> Self {
        if value == 0 {
            self.fail("window_size must be > 0");
        }
        self.window_size = value;
        self
    }

    pub fn num_threads(mut self, value: usize) -> Self {
        if value == 0 {
            self.fail("num_threads must be > 0");
        }
        self.num_threads = value;
        self
    }

    pub fn iterations(mut self, value: u64) -> Self {
        if value == 0 {
            self.fail("iterations must be > 0");
        }
        self.iterations = value;
        self
    }

    pub fn negative_samples(mut self, value: u32) -> Self {
        self.negative_samples = value;
        self
    }

    pub fn use_hierarchical_softmax(mut self, value: bool) -> Self {
        self.use_hierarchical_softmax = value;
        self
    }

    pub fn down_sample_rate(mut self, value: f64) -> Self {
        if value < 0.0 {
            self.fail("down_sample_rate must be >= 0");
        }
        self.down_sample_rate = value;
        self
    }

    pub fn initial_learning_rate(mut self, value: f32) -> Self {
        if value <= 0.0 {
            self.fail("initial_learning_rate must be > 0");
        }
        self.initial_learning_rate = Some(value);
        self
    }

    pub fn build(self) -> Result<TrainingConfig> {
        if let Some(msg) = self.error {
            return Err(Error::InvalidConfig(msg));
        }
        let initial_learning_rate = self.initial_learning_rate.unwrap_or(match self.training_type
        {
            TrainingType::Cbow => 0.05,
            TrainingType::SkipGram => 0.025,
        });
        Ok(TrainingConfig {
            training_type: self.training_type,
            layer_size: self.layer_size,
            window_size: self.window_size,
            num_threads: self.num_threads,
            iterations: self.iterations,
            negative_samples: self.negative_samples,
            use_hierarchical_softmax: self.use_hierarchical_softmax,
            down_sample_rate: self.down_sample_rate,
            initial_learning_rate,
        })
    }
}
