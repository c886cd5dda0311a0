pub mod use_cases;

pub use use_cases::exploration::{explore, ExplorationReport, RecordFilter};
pub use use_cases::training_pipeline::{RunReport, TrainingPipeline};
