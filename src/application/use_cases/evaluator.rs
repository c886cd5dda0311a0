// ============================================================
// EVALUATOR
// ============================================================
// Confusion matrix, derived metrics and ROC/AUC from predicted probabilities

use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::evaluation::{ConfusionMatrix, EvaluationSummary, RocCurve, RocPoint};

/// Number of intervals between the sampled ROC thresholds (0.00, 0.01, ... 1.00)
pub const ROC_STEPS: usize = 100;

fn check_lengths(probabilities: &[f64], labels: &[u8]) -> Result<()> {
    if probabilities.len() != labels.len() {
        return Err(AppError::ValidationError(format!(
            "Got {} probabilities for {} labels",
            probabilities.len(),
            labels.len()
        )));
    }
    Ok(())
}

fn count(probabilities: &[f64], labels: &[u8], threshold: f64) -> ConfusionMatrix {
    let mut matrix = ConfusionMatrix::default();
    for (&probability, &label) in probabilities.iter().zip(labels) {
        let predicted_positive = probability >= threshold;
        match (predicted_positive, label == 1) {
            (true, true) => matrix.true_positive += 1,
            (false, false) => matrix.true_negative += 1,
            (true, false) => matrix.false_positive += 1,
            (false, true) => matrix.false_negative += 1,
        }
    }
    matrix
}

/// A sample is predicted positive when its probability is at least `threshold`
pub fn confusion_matrix(
    probabilities: &[f64],
    labels: &[u8],
    threshold: f64,
) -> Result<ConfusionMatrix> {
    check_lengths(probabilities, labels)?;
    Ok(count(probabilities, labels, threshold))
}

/// ROC sampled at 101 evenly spaced thresholds, AUC by the trapezoidal rule.
///
/// Thresholds rise from 0 to 1, so the false positive rate only falls; each step
/// contributes `(fpr[i-1] - fpr[i]) * (tpr[i] + tpr[i-1]) / 2`.
pub fn roc_curve(probabilities: &[f64], labels: &[u8]) -> Result<RocCurve> {
    check_lengths(probabilities, labels)?;

    let points: Vec<RocPoint> = (0..=ROC_STEPS)
        .map(|step| {
            let threshold = step as f64 / ROC_STEPS as f64;
            let matrix = count(probabilities, labels, threshold);
            RocPoint {
                threshold,
                false_positive_rate: matrix.false_positive_rate(),
                true_positive_rate: matrix.recall(),
            }
        })
        .collect();

    let auc = points
        .windows(2)
        .map(|pair| {
            let (prev, cur) = (&pair[0], &pair[1]);
            (prev.false_positive_rate - cur.false_positive_rate)
                * (cur.true_positive_rate + prev.true_positive_rate)
                / 2.0
        })
        .sum();

    Ok(RocCurve { points, auc })
}

pub fn evaluate(probabilities: &[f64], labels: &[u8], threshold: f64) -> Result<EvaluationSummary> {
    let confusion_matrix = confusion_matrix(probabilities, labels, threshold)?;
    let roc = roc_curve(probabilities, labels)?;
    let metrics = confusion_matrix.metrics();

    debug!(
        threshold,
        accuracy = metrics.accuracy,
        auc = roc.auc,
        "Evaluated {} samples",
        confusion_matrix.total()
    );

    Ok(EvaluationSummary {
        threshold,
        confusion_matrix,
        metrics,
        roc,
    })
}
