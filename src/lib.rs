mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use app::run;
pub use application::use_cases::evaluator::{confusion_matrix, evaluate, roc_curve};
pub use application::use_cases::preprocessing::{preprocess, PreprocessedData, Preprocessor};
pub use application::use_cases::splitter::split;
pub use application::use_cases::training_pipeline::{write_outputs, RunReport, TrainingPipeline};
pub use domain::csv::{Record, Value};
pub use domain::error::{AppError, Result};
pub use domain::pipeline_config::PipelineConfig;
pub use infrastructure::classifiers::{Classifier, LogisticRegression};
pub use infrastructure::csv::CsvParser;
