use serde::{Deserialize, Serialize};
use tracing::warn;

/// `threshold` is `None` for the origin point, which lies above every score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub threshold: Option<f64>,
    pub fpr: f64,
    pub tpr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub points: Vec<RocPoint>,
    pub auc: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrPoint {
    pub threshold: Option<f64>,
    pub precision: f64,
    pub recall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRecallCurve {
    pub points: Vec<PrPoint>,
    pub average_precision: f64,
}

/// Cumulative `(threshold, tp, fp)` after each group of equal scores, in
/// decreasing score order.
fn cumulative_counts(scores: &[f64], truth: &[usize]) -> Vec<(f64, usize, usize)> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut out = Vec::new();
    let (mut tp, mut fp) = (0, 0);
    let mut k = 0;
    while k < order.len() {
        let threshold = scores[order[k]];
        while k < order.len() && scores[order[k]] == threshold {
            if truth[order[k]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            k += 1;
        }
        out.push((threshold, tp, fp));
    }
    out
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// ROC curve over every distinct score, starting at `(0, 0)`.
///
/// Tied scores form a single step, so the curve does not depend on row
/// order. AUC is the trapezoidal area.
pub fn roc_curve(scores: &[f64], truth: &[usize]) -> RocCurve {
    debug_assert_eq!(scores.len(), truth.len());
    let positives = truth.iter().filter(|&&t| t == 1).count();
    let negatives = truth.len() - positives;
    if positives == 0 || negatives == 0 {
        warn!(positives, negatives, "ROC curve is undefined for a single-class test set");
    }

    let mut points = vec![RocPoint {
        threshold: None,
        fpr: 0.0,
        tpr: 0.0,
    }];
    points.extend(
        cumulative_counts(scores, truth)
            .into_iter()
            .map(|(threshold, tp, fp)| RocPoint {
                threshold: Some(threshold),
                fpr: ratio(fp, negatives),
                tpr: ratio(tp, positives),
            }),
    );

    let auc = points
        .windows(2)
        .map(|w| (w[1].fpr - w[0].fpr) * (w[0].tpr + w[1].tpr) / 2.0)
        .sum();
    RocCurve { points, auc }
}

/// Precision-recall curve over every distinct score, starting at
/// `(recall 0, precision 1)`.
///
/// Average precision is `Σ (Rₙ − Rₙ₋₁) · Pₙ`, the step-wise area.
pub fn precision_recall_curve(scores: &[f64], truth: &[usize]) -> PrecisionRecallCurve {
    debug_assert_eq!(scores.len(), truth.len());
    let positives = truth.iter().filter(|&&t| t == 1).count();
    if positives == 0 {
        warn!("precision-recall curve has no positive rows; recall is reported as 0.0");
    }

    let mut points = vec![PrPoint {
        threshold: None,
        precision: 1.0,
        recall: 0.0,
    }];
    points.extend(
        cumulative_counts(scores, truth)
            .into_iter()
            .map(|(threshold, tp, fp)| PrPoint {
                threshold: Some(threshold),
                precision: ratio(tp, tp + fp),
                recall: ratio(tp, positives),
            }),
    );

    let average_precision = points
        .windows(2)
        .map(|w| (w[1].recall - w[0].recall) * w[1].precision)
        .sum();
    PrecisionRecallCurve {
        points,
        average_precision,
    }
}
