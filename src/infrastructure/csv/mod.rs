// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing with encoding fallback, and prediction exports

mod csv_parser;
mod submission_writer;

pub use csv_parser::CsvParser;
pub use submission_writer::SubmissionWriter;
