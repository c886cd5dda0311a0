pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod pipeline_config;
pub mod training;

// Tagged CSV values and records
pub mod csv;
