pub mod classifiers;
pub mod config;
pub mod storage;

// CSV reading and prediction export
pub mod csv;
