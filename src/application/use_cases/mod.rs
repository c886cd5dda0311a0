pub mod evaluator;
pub mod exploration;
pub mod feature_extractor;
pub mod feature_importance;
pub mod preprocessing;
pub mod splitter;
pub mod statistics;
pub mod training_pipeline;
