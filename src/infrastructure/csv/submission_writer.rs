// ============================================================
// SUBMISSION WRITER
// ============================================================
// Two-column prediction exports, one row per test record

use csv::Writer;
use std::io::Write;

use crate::domain::error::{AppError, Result};

/// Writes predicted classes and probabilities keyed by passenger id
pub struct SubmissionWriter {
    id_column: String,
    threshold: f64,
}

impl SubmissionWriter {
    pub fn new(id_column: impl Into<String>, threshold: f64) -> Self {
        Self {
            id_column: id_column.into(),
            threshold,
        }
    }

    /// `<id>,Survived` rows with the 0/1 class at the configured threshold
    pub fn write_submission<W: Write>(
        &self,
        out: W,
        ids: &[String],
        probabilities: &[f64],
    ) -> Result<()> {
        check_lengths(ids, probabilities)?;
        let mut writer = Writer::from_writer(out);
        writer.write_record([self.id_column.as_str(), "Survived"])?;
        for (id, &p) in ids.iter().zip(probabilities) {
            let class = if p >= self.threshold { "1" } else { "0" };
            writer.write_record([id.as_str(), class])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// `<id>,Probability` rows formatted to 6 decimal places
    pub fn write_probabilities<W: Write>(
        &self,
        out: W,
        ids: &[String],
        probabilities: &[f64],
    ) -> Result<()> {
        check_lengths(ids, probabilities)?;
        let mut writer = Writer::from_writer(out);
        writer.write_record([self.id_column.as_str(), "Probability"])?;
        for (id, p) in ids.iter().zip(probabilities) {
            writer.write_record([id.clone(), format!("{:.6}", p)])?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn check_lengths(ids: &[String], probabilities: &[f64]) -> Result<()> {
    if ids.len() != probabilities.len() {
        return Err(AppError::ValidationError(format!(
            "{} ids but {} predicted probabilities",
            ids.len(),
            probabilities.len()
        )));
    }
    Ok(())
}
