use serde::{Deserialize, Serialize};

/// Fixed-length numeric encoding of one passenger record
pub type FeatureVector = Vec<f64>;

/// Source column names in the passenger CSV
pub mod columns {
    pub const AGE: &str = "Age";
    pub const FARE: &str = "Fare";
    pub const PCLASS: &str = "Pclass";
    pub const SEX: &str = "Sex";
    pub const SIB_SP: &str = "SibSp";
    pub const PARCH: &str = "Parch";
    pub const EMBARKED: &str = "Embarked";

    /// Columns every record must carry for feature extraction
    pub const FEATURE_COLUMNS: [&str; 7] = [AGE, FARE, PCLASS, SEX, SIB_SP, PARCH, EMBARKED];
}

pub const PCLASS_CATEGORIES: [f64; 3] = [1.0, 2.0, 3.0];
pub const SEX_CATEGORIES: [&str; 2] = ["male", "female"];
pub const EMBARKED_CATEGORIES: [&str; 3] = ["C", "Q", "S"];

/// Port assumed when no embarkation value is known at all
pub const DEFAULT_EMBARKED: &str = "S";

/// Imputation and standardisation constants, derived from training records only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImputationParameters {
    pub age_median: f64,
    pub fare_median: f64,
    pub embarked_mode: String,
    pub age_std_dev: f64,
    pub fare_std_dev: f64,
}

/// Slot names of a feature vector, in assembly order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLayout {
    include_family_features: bool,
    names: Vec<String>,
}

const BASE_FEATURES: [&str; 12] = [
    "age",
    "fare",
    "sib_sp",
    "parch",
    "pclass_1",
    "pclass_2",
    "pclass_3",
    "sex_male",
    "sex_female",
    "embarked_c",
    "embarked_q",
    "embarked_s",
];

const FAMILY_FEATURES: [&str; 2] = ["family_size", "is_alone"];

impl FeatureLayout {
    pub fn new(include_family_features: bool) -> Self {
        let mut names: Vec<String> = BASE_FEATURES.iter().map(|s| s.to_string()).collect();
        if include_family_features {
            names.extend(FAMILY_FEATURES.iter().map(|s| s.to_string()));
        }
        Self {
            include_family_features,
            names,
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
