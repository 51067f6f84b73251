use crate::core::dataset::ClassNames;
use crate::evaluation::ConfusionCounts;
use crate::evaluation::plots::chart::unit_square_chart;
use crate::evaluation::plots::curves::{PrecisionRecallCurve, RocCurve};
use crate::evaluation::plots::PlotKind;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Confusion matrix with display names; rows are true labels, columns
/// predicted labels, both in code order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfusionMatrixPlot {
    pub class_names: ClassNames,
    pub matrix: [[usize; 2]; 2],
}

impl ConfusionMatrixPlot {
    pub fn new(counts: &ConfusionCounts, class_names: ClassNames) -> Self {
        Self {
            class_names,
            matrix: counts.matrix(),
        }
    }
}

impl Display for ConfusionMatrixPlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names = self.class_names.as_slice();
        let label_w = names.iter().map(String::len).max().unwrap_or(0).max(4);
        let cell_w = names
            .iter()
            .map(String::len)
            .chain(self.matrix.iter().flatten().map(|c| c.to_string().len()))
            .max()
            .unwrap_or(1);

        writeln!(f, "Confusion Matrix (rows: true, columns: predicted)")?;
        write!(f, "{:label_w$}", "")?;
        for name in names {
            write!(f, "  {name:>cell_w$}")?;
        }
        for (name, row) in names.iter().zip(self.matrix.iter()) {
            writeln!(f)?;
            write!(f, "{name:<label_w$}")?;
            for count in row {
                write!(f, "  {count:>cell_w$}")?;
            }
        }
        Ok(())
    }
}

/// One rendered diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PlotArtifact {
    ConfusionMatrix(ConfusionMatrixPlot),
    RocCurve(RocCurve),
    PrecisionRecallCurve(PrecisionRecallCurve),
}

impl PlotArtifact {
    pub fn kind(&self) -> PlotKind {
        match self {
            PlotArtifact::ConfusionMatrix(_) => PlotKind::ConfusionMatrix,
            PlotArtifact::RocCurve(_) => PlotKind::RocCurve,
            PlotArtifact::PrecisionRecallCurve(_) => PlotKind::PrecisionRecallCurve,
        }
    }
}

impl Display for PlotArtifact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotArtifact::ConfusionMatrix(cm) => cm.fmt(f),
            PlotArtifact::RocCurve(roc) => {
                writeln!(f, "ROC Curve (AUC = {:.2})", roc.auc)?;
                let pts: Vec<(f64, f64)> = roc.points.iter().map(|p| (p.fpr, p.tpr)).collect();
                unit_square_chart(f, &pts, "False Positive Rate", "True Positive Rate")
            }
            PlotArtifact::PrecisionRecallCurve(pr) => {
                writeln!(
                    f,
                    "Precision-Recall Curve (AP = {:.2})",
                    pr.average_precision
                )?;
                let pts: Vec<(f64, f64)> =
                    pr.points.iter().map(|p| (p.recall, p.precision)).collect();
                unit_square_chart(f, &pts, "Recall", "Precision")
            }
        }
    }
}
