pub mod logistic_regression;

use crate::domain::error::Result;
use crate::domain::features::FeatureVector;
use crate::domain::training::{FitConfig, TrainingHistory};
use async_trait::async_trait;

pub use logistic_regression::LogisticRegression;

/// Binary probabilistic model driven by the training pipeline.
///
/// `fit` takes `&mut self`, so one instance can never be fitted and queried at the same time.
#[async_trait]
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    async fn fit(
        &mut self,
        features: &[FeatureVector],
        labels: &[u8],
        config: &FitConfig,
    ) -> Result<TrainingHistory>;

    /// Probability of the positive class for each row
    async fn predict(&self, features: &[FeatureVector]) -> Result<Vec<f64>>;

    /// Per-feature linear weights, for models that have them
    fn weights(&self) -> Option<&[f64]> {
        None
    }
}
