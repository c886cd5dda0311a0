use serde::{Deserialize, Serialize};

use super::error::{AppError, Result};
use super::features::FeatureVector;

/// Feature matrix with its parallel 0/1 label vector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainDataset {
    features: Vec<FeatureVector>,
    labels: Vec<u8>,
}

impl TrainDataset {
    /// Row i of `features` belongs to `labels[i]`
    pub fn new(features: Vec<FeatureVector>, labels: Vec<u8>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(AppError::ValidationError(format!(
                "Training dataset has {} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if let Some(bad) = labels.iter().find(|&&label| label > 1) {
            return Err(AppError::ValidationError(format!(
                "Labels must be 0 or 1, got {}",
                bad
            )));
        }

        Ok(Self { features, labels })
    }

    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Feature matrix with its parallel identifier list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestDataset {
    features: Vec<FeatureVector>,
    ids: Vec<String>,
}

impl TestDataset {
    pub fn new(features: Vec<FeatureVector>, ids: Vec<String>) -> Result<Self> {
        if features.len() != ids.len() {
            return Err(AppError::ValidationError(format!(
                "Test dataset has {} feature rows but {} ids",
                features.len(),
                ids.len()
            )));
        }

        Ok(Self { features, ids })
    }

    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
