// ============================================================
// PIPELINE CONFIGURATION
// ============================================================
// Tunable values for preprocessing, training and evaluation

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one training/evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Append `family_size` and `is_alone` to every feature vector
    pub include_family_features: bool,

    /// Share of the training rows kept for fitting; the rest validates (default: 0.8)
    pub validation_fraction: f64,

    /// Decision threshold applied to predicted probabilities (default: 0.5)
    pub threshold: f64,

    /// Passes over the training subset (default: 50)
    pub epochs: usize,

    /// Rows per gradient step (default: 32)
    pub batch_size: usize,

    /// Gradient descent step size (default: 0.1)
    pub learning_rate: f64,

    /// Column holding the 0/1 survival label
    pub label_column: String,

    /// Column identifying passengers in the test set
    pub id_column: String,

    /// Directory receiving submission.csv, probabilities.csv and report.json
    pub output_dir: PathBuf,

    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            include_family_features: false,
            validation_fraction: 0.8,
            threshold: 0.5,
            epochs: 50,
            batch_size: 32,
            learning_rate: 0.1,
            label_column: "Survived".to_string(),
            id_column: "PassengerId".to_string(),
            output_dir: PathBuf::from("output"),
            log_level: "info".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !(self.validation_fraction > 0.0 && self.validation_fraction <= 1.0) {
            return Err("validation_fraction must be in (0.0, 1.0]".to_string());
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err("threshold must be between 0.0 and 1.0".to_string());
        }
        if self.epochs == 0 {
            return Err("epochs must be > 0".to_string());
        }
        if self.batch_size == 0 {
            return Err("batch_size must be > 0".to_string());
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err("learning_rate must be a positive number".to_string());
        }
        if self.label_column.trim().is_empty() || self.id_column.trim().is_empty() {
            return Err("label_column and id_column must not be empty".to_string());
        }
        Ok(())
    }
}
