use crate::evaluation::{Measurement, PerformanceEvaluator};
use serde::Serialize;
use tracing::warn;

/// 2×2 confusion counts with label 1 as the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionCounts {
    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    /// Row = true label, column = predicted label.
    pub fn matrix(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    /// `tp / (tp + fp)`, or 0.0 when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// `tp / (tp + fn)`, or 0.0 when there are no positive rows.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0.0 { 2.0 * p * r / (p + r) } else { 0.0 }
    }

    /// Cohen's κ; 0.0 when chance agreement is total.
    pub fn kappa(&self) -> f64 {
        let n = self.total() as f64;
        if n == 0.0 {
            return 0.0;
        }
        let p_o = self.accuracy();
        let truth_pos = (self.true_positive + self.false_negative) as f64 / n;
        let pred_pos = (self.true_positive + self.false_positive) as f64 / n;
        let p_e = truth_pos * pred_pos + (1.0 - truth_pos) * (1.0 - pred_pos);
        let denom = 1.0 - p_e;
        if denom.abs() > f64::EPSILON { (p_o - p_e) / denom } else { 0.0 }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Batch evaluator for binary predictions.
///
/// Reports `accuracy`, `precision`, `recall`, `f1` and `kappa` with binary
/// averaging on the positive label. Undefined ratios are reported as 0.0.
#[derive(Debug, Clone, Default)]
pub struct BinaryClassificationEvaluator {
    counts: ConfusionCounts,
}

impl BinaryClassificationEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confusion(&self) -> ConfusionCounts {
        self.counts
    }
}

impl PerformanceEvaluator for BinaryClassificationEvaluator {
    fn reset(&mut self) {
        self.counts = ConfusionCounts::default();
    }

    fn add_result(&mut self, truth: usize, predicted: usize) {
        let c = &mut self.counts;
        match (truth, predicted) {
            (0, 0) => c.true_negative += 1,
            (0, 1) => c.false_positive += 1,
            (1, 0) => c.false_negative += 1,
            (1, 1) => c.true_positive += 1,
            _ => {}
        }
    }

    fn performance(&self) -> Vec<Measurement> {
        let c = &self.counts;
        if c.total() > 0 {
            if c.true_positive + c.false_positive == 0 {
                warn!("precision is ill-defined with no predicted positives; reporting 0.0");
            }
            if c.true_positive + c.false_negative == 0 {
                warn!("recall is ill-defined with no true positives; reporting 0.0");
            }
        }
        vec![
            Measurement::new("accuracy", c.accuracy()),
            Measurement::new("precision", c.precision()),
            Measurement::new("recall", c.recall()),
            Measurement::new("f1", c.f1()),
            Measurement::new("kappa", c.kappa()),
        ]
    }
}
