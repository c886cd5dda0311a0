// ============================================================
// TRAIN / VALIDATION SPLITTER
// ============================================================

use crate::domain::dataset::TrainDataset;
use crate::domain::error::{AppError, Result};

/// Take the first `floor(len * fraction)` rows for training, the rest for validation.
///
/// Row order is preserved; callers shuffle beforehand if they want a random split.
pub fn split(dataset: &TrainDataset, fraction: f64) -> Result<(TrainDataset, TrainDataset)> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(AppError::ValidationError(format!(
            "Split fraction must be within [0, 1], got {}",
            fraction
        )));
    }

    let cut = ((dataset.len() as f64) * fraction).floor() as usize;
    let cut = cut.min(dataset.len());

    let (features, labels) = (dataset.features(), dataset.labels());
    let train = TrainDataset::new(features[..cut].to_vec(), labels[..cut].to_vec())?;
    let validation = TrainDataset::new(features[cut..].to_vec(), labels[cut..].to_vec())?;
    Ok((train, validation))
}
