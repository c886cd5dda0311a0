// ============================================================
// FEATURE IMPORTANCE
// ============================================================

use serde::Serialize;

use crate::domain::error::{AppError, Result};
use crate::domain::features::FeatureLayout;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub weight: f64,
    /// `|weight|` as a share of the total absolute weight
    pub importance: f64,
}

/// Rank layout slots by absolute linear weight, largest first, ties in layout order
pub fn feature_importance(layout: &FeatureLayout, weights: &[f64]) -> Result<Vec<FeatureImportance>> {
    if weights.len() != layout.len() {
        return Err(AppError::ValidationError(format!(
            "Got {} weights for {} features",
            weights.len(),
            layout.len()
        )));
    }

    let total: f64 = weights.iter().map(|w| w.abs()).sum();
    let mut ranked: Vec<FeatureImportance> = layout
        .names()
        .iter()
        .zip(weights)
        .map(|(name, &weight)| FeatureImportance {
            feature: name.clone(),
            weight,
            importance: if total > 0.0 { weight.abs() / total } else { 0.0 },
        })
        .collect();

    // sort_by is stable, so equal weights keep layout order
    ranked.sort_by(|a, b| b.weight.abs().total_cmp(&a.weight.abs()));
    Ok(ranked)
}
