// ============================================================
// PREPROCESSING USE CASE
// ============================================================
// Derive imputation constants from training records, then encode train and test

use serde::Serialize;
use tracing::{info, warn};

use crate::application::use_cases::feature_extractor::extract;
use crate::application::use_cases::statistics::{median, mode, std_dev};
use crate::domain::csv::{Record, Value};
use crate::domain::dataset::{TestDataset, TrainDataset};
use crate::domain::error::{AppError, Result};
use crate::domain::features::{columns, FeatureLayout, ImputationParameters, DEFAULT_EMBARKED};
use crate::domain::pipeline_config::PipelineConfig;

/// Encoded train/test sets plus the constants used to encode them
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessedData {
    pub train: TrainDataset,
    pub test: TestDataset,
    pub params: ImputationParameters,
    pub layout: FeatureLayout,
}

/// Preprocessing use case
pub struct Preprocessor {
    include_family_features: bool,
    label_column: String,
    id_column: String,
}

impl Preprocessor {
    pub fn new(include_family_features: bool) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            include_family_features,
            label_column: defaults.label_column,
            id_column: defaults.id_column,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            include_family_features: config.include_family_features,
            label_column: config.label_column.clone(),
            id_column: config.id_column.clone(),
        }
    }

    /// Medians, spreads and port mode of the training records only
    pub fn imputation_parameters(train: &[Record]) -> ImputationParameters {
        let ages = || train.iter().map(|r| r.get(columns::AGE).as_number());
        let fares = || train.iter().map(|r| r.get(columns::FARE).as_number());

        let embarked_mode = match mode(train.iter().map(|r| r.get(columns::EMBARKED))) {
            Value::Absent => DEFAULT_EMBARKED.to_string(),
            value => value.to_string(),
        };

        ImputationParameters {
            age_median: median(ages()),
            fare_median: median(fares()),
            embarked_mode,
            age_std_dev: std_dev(ages()),
            fare_std_dev: std_dev(fares()),
        }
    }

    pub fn preprocess(&self, train: &[Record], test: &[Record]) -> Result<PreprocessedData> {
        if train.is_empty() {
            return Err(AppError::ValidationError(
                "Training set is empty".to_string(),
            ));
        }
        if test.is_empty() {
            return Err(AppError::ValidationError("Test set is empty".to_string()));
        }

        self.check_columns("training", train, &self.label_column)?;
        self.check_columns("test", test, &self.id_column)?;

        let params = Self::imputation_parameters(train);
        info!(
            age_median = params.age_median,
            fare_median = params.fare_median,
            embarked_mode = %params.embarked_mode,
            "Computed imputation parameters from {} training records",
            train.len()
        );

        let (features, labels): (Vec<_>, Vec<_>) = train
            .iter()
            .map(|record| {
                (
                    extract(record, &params, self.include_family_features),
                    label_of(record.get(&self.label_column)),
                )
            })
            .unzip();
        let train_set = TrainDataset::new(features, labels)?;

        let (features, ids): (Vec<_>, Vec<_>) = test
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                (
                    extract(record, &params, self.include_family_features),
                    self.id_of(idx, record),
                )
            })
            .unzip();
        let test_set = TestDataset::new(features, ids)?;

        Ok(PreprocessedData {
            train: train_set,
            test: test_set,
            params,
            layout: FeatureLayout::new(self.include_family_features),
        })
    }

    /// Every record must carry the feature columns plus `extra`
    fn check_columns(&self, set: &str, records: &[Record], extra: &str) -> Result<()> {
        for (idx, record) in records.iter().enumerate() {
            let missing = columns::FEATURE_COLUMNS
                .iter()
                .copied()
                .chain(std::iter::once(extra))
                .find(|column| !record.has_column(column));

            if let Some(column) = missing {
                return Err(AppError::ValidationError(format!(
                    "{} record {} has no '{}' column",
                    set,
                    idx + 1,
                    column
                )));
            }
        }
        Ok(())
    }

    fn id_of(&self, idx: usize, record: &Record) -> String {
        match record.get(&self.id_column) {
            Value::Absent => {
                warn!(row = idx + 1, "Test record has no id; using its row position");
                (idx + 1).to_string()
            }
            value => value.to_string(),
        }
    }
}

/// 1 only for a value numerically equal to 1; everything else, absent included, is 0
pub fn label_of(value: &Value) -> u8 {
    match value.as_number() {
        Some(n) if n == 1.0 => 1,
        _ => 0,
    }
}

/// Encode train and test sets with the default column names
pub fn preprocess(
    train: &[Record],
    test: &[Record],
    include_family_features: bool,
) -> Result<(TrainDataset, TestDataset, ImputationParameters)> {
    let data = Preprocessor::new(include_family_features).preprocess(train, test)?;
    Ok((data.train, data.test, data.params))
}
