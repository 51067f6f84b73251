use crate::evaluation::plots::PlotArtifact;
use crate::utils::math::round_to;
use serde::Serialize;
use std::fmt::{Display, Formatter};

const REPORT_DECIMALS: i32 = 2;

/// What the user sees for one request: rounded headline metrics and the
/// requested plots in rendering order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub classifier: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub plots: Vec<PlotArtifact>,
}

impl EvaluationReport {
    pub fn new(
        classifier: String,
        accuracy: f64,
        precision: f64,
        recall: f64,
        plots: Vec<PlotArtifact>,
    ) -> Self {
        Self {
            classifier,
            accuracy: round_to(accuracy, REPORT_DECIMALS),
            precision: round_to(precision, REPORT_DECIMALS),
            recall: round_to(recall, REPORT_DECIMALS),
            plots,
        }
    }
}

impl Display for EvaluationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} Results", self.classifier)?;
        writeln!(f, "Accuracy:  {:.2}", self.accuracy)?;
        writeln!(f, "Precision: {:.2}", self.precision)?;
        write!(f, "Recall:    {:.2}", self.recall)?;
        for plot in &self.plots {
            write!(f, "\n\n{plot}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_metrics_to_two_places() {
        let r = EvaluationReport::new("KNN".into(), 0.98765, 0.5, 1.0 / 3.0, vec![]);
        assert_eq!(r.accuracy, 0.99);
        assert_eq!(r.precision, 0.5);
        assert_eq!(r.recall, 0.33);
    }

    #[test]
    fn display_lists_headline_metrics() {
        let r = EvaluationReport::new("SVM (C=1)".into(), 0.5, 1.0, 0.25, vec![]);
        assert_eq!(
            r.to_string(),
            "SVM (C=1) Results\nAccuracy:  0.50\nPrecision: 1.00\nRecall:    0.25"
        );
    }
}
