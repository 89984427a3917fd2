use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hyperparameters for minibatch SGD with patience-based early stopping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Learning rate for the gradient step
    pub learning_rate: f32,

    /// Upper bound on the number of epochs
    pub max_epochs: usize,

    /// Rows per minibatch
    pub batch_size: usize,

    /// Minibatches to look at regardless of validation results
    pub initial_patience: usize,

    /// Patience multiplier applied to the iteration count on a significant improvement
    pub patience_increase: f32,

    /// Relative improvement of the validation error considered significant
    pub improvement_threshold: f32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            learning_rate: 0.13,
            max_epochs: 1000,
            batch_size: 600,
            initial_patience: 5000,
            patience_increase: 2.0,
            improvement_threshold: 0.995,
        }
    }
}

impl TrainingConfig {
    /// Parses a JSON document. Missing fields take their default value.
    ///
    /// # Example
    ///
    /// ```json
    /// { "learning_rate": 0.1, "batch_size": 10 }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TrainingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Rejects configurations that cannot drive a training run.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if self.max_epochs == 0 {
            return Err(Error::InvalidConfig("max_epochs must be > 0".to_owned()));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be > 0".to_owned()));
        }
        if self.initial_patience == 0 {
            return Err(Error::InvalidConfig(
                "initial_patience must be > 0".to_owned(),
            ));
        }
        if !(self.patience_increase.is_finite() && self.patience_increase > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "patience_increase must be finite and > 0, got {}",
                self.patience_increase
            )));
        }
        if !(self.improvement_threshold > 0.0 && self.improvement_threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "improvement_threshold must be in (0, 1], got {}",
                self.improvement_threshold
            )));
        }
        Ok(())
    }

    /// Number of minibatches between two validation checks.
    ///
    /// Never zero, so it is always safe to use as a modulus.
    pub fn validation_frequency(&self, num_train_batches: usize) -> usize {
        num_train_batches.min(self.initial_patience / 2).max(1)
    }
}
