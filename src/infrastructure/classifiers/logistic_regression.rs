use async_trait::async_trait;
use tracing::{debug, info};

use super::Classifier;
use crate::domain::error::{AppError, Result};
use crate::domain::features::FeatureVector;
use crate::domain::training::{EpochStats, FitConfig, TrainingHistory, Validation};

const PROBABILITY_EPSILON: f64 = 1e-12;

/// Single sigmoid unit trained by mini-batch gradient descent on binary cross-entropy
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    bias: f64,
    fitted: bool,
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn width_of(features: &[FeatureVector]) -> Result<usize> {
    let width = features.first().map_or(0, |row| row.len());
    if let Some((idx, row)) = features.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(AppError::ModelError(format!(
            "Row {} has {} features, expected {}",
            idx + 1,
            row.len(),
            width
        )));
    }
    Ok(width)
}

fn check_labels(features: &[FeatureVector], labels: &[u8]) -> Result<()> {
    if features.len() != labels.len() {
        return Err(AppError::ModelError(format!(
            "Got {} feature rows but {} labels",
            features.len(),
            labels.len()
        )));
    }
    Ok(())
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    fn probability(&self, row: &[f64]) -> f64 {
        let z: f64 = self.weights.iter().zip(row).map(|(w, x)| w * x).sum::<f64>() + self.bias;
        sigmoid(z)
    }

    /// Mean cross-entropy and accuracy at 0.5 over a labelled set
    fn score(&self, features: &[FeatureVector], labels: &[u8]) -> (f64, f64) {
        if features.is_empty() {
            return (0.0, 0.0);
        }

        let mut loss = 0.0;
        let mut correct = 0usize;
        for (row, &label) in features.iter().zip(labels) {
            let p = self
                .probability(row)
                .clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
            let y = f64::from(label);
            loss -= y * p.ln() + (1.0 - y) * (1.0 - p).ln();
            if (p >= 0.5) == (label == 1) {
                correct += 1;
            }
        }
        let n = features.len() as f64;
        (loss / n, correct as f64 / n)
    }

    fn step(&mut self, batch: &[FeatureVector], labels: &[u8], learning_rate: f64) {
        let mut grad_w = vec![0.0; self.weights.len()];
        let mut grad_b = 0.0;
        for (row, &label) in batch.iter().zip(labels) {
            let error = self.probability(row) - f64::from(label);
            for (g, x) in grad_w.iter_mut().zip(row) {
                *g += error * x;
            }
            grad_b += error;
        }

        let scale = learning_rate / batch.len() as f64;
        for (w, g) in self.weights.iter_mut().zip(&grad_w) {
            *w -= scale * g;
        }
        self.bias -= scale * grad_b;
    }
}

#[async_trait]
impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    async fn fit(
        &mut self,
        features: &[FeatureVector],
        labels: &[u8],
        config: &FitConfig,
    ) -> Result<TrainingHistory> {
        check_labels(features, labels)?;
        if config.epochs == 0 || config.batch_size == 0 {
            return Err(AppError::ModelError(
                "epochs and batch_size must be positive".to_string(),
            ));
        }
        if !config.learning_rate.is_finite() || config.learning_rate <= 0.0 {
            return Err(AppError::ModelError(format!(
                "learning_rate must be a positive number, got {}",
                config.learning_rate
            )));
        }

        let (train_x, train_y, val_x, val_y) = match &config.validation {
            Validation::None => (features, labels, &features[..0], &labels[..0]),
            Validation::Split(fraction) => {
                if !(0.0..1.0).contains(fraction) {
                    return Err(AppError::ModelError(format!(
                        "Validation split must be within [0, 1), got {}",
                        fraction
                    )));
                }
                let held_out = (features.len() as f64 * fraction).floor() as usize;
                let cut = features.len() - held_out;
                (&features[..cut], &labels[..cut], &features[cut..], &labels[cut..])
            }
            Validation::Data(dataset) => {
                (features, labels, dataset.features(), dataset.labels())
            }
        };

        if train_x.is_empty() {
            return Err(AppError::ModelError("No rows to fit".to_string()));
        }
        let width = width_of(train_x)?;
        if !val_x.is_empty() && width_of(val_x)? != width {
            return Err(AppError::ModelError(format!(
                "Validation rows have {} features, expected {}",
                val_x[0].len(),
                width
            )));
        }

        self.weights = vec![0.0; width];
        self.bias = 0.0;
        self.fitted = false;

        info!(
            rows = train_x.len(),
            validation_rows = val_x.len(),
            width,
            epochs = config.epochs,
            "Fitting logistic regression"
        );

        let mut history = TrainingHistory::default();
        for epoch in 1..=config.epochs {
            for (batch, batch_labels) in train_x
                .chunks(config.batch_size)
                .zip(train_y.chunks(config.batch_size))
            {
                self.step(batch, batch_labels, config.learning_rate);
            }

            let (loss, accuracy) = self.score(train_x, train_y);
            let (val_loss, val_accuracy) = if val_x.is_empty() {
                (None, None)
            } else {
                let (l, a) = self.score(val_x, val_y);
                (Some(l), Some(a))
            };
            debug!(epoch, loss, accuracy, ?val_loss, ?val_accuracy, "Epoch finished");

            history.push(EpochStats {
                epoch,
                loss,
                accuracy,
                val_loss,
                val_accuracy,
            });

            tokio::task::yield_now().await;
        }

        self.fitted = true;
        Ok(history)
    }

    async fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(AppError::ModelError(
                "Model must be fitted before predicting".to_string(),
            ));
        }
        if let Some((idx, row)) = features
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.weights.len())
        {
            return Err(AppError::ModelError(format!(
                "Row {} has {} features, model was fitted on {}",
                idx + 1,
                row.len(),
                self.weights.len()
            )));
        }

        Ok(features.iter().map(|row| self.probability(row)).collect())
    }

    fn weights(&self) -> Option<&[f64]> {
        Some(self.weights.as_slice())
    }
}
