mod artifact;
mod chart;
mod curves;
mod export;
mod kind;
mod render;

pub use artifact::{ConfusionMatrixPlot, PlotArtifact};
pub use curves::{
    PrPoint, PrecisionRecallCurve, RocCurve, RocPoint, precision_recall_curve, roc_curve,
};
pub use export::{ExportFormat, export_all, export_artifact};
pub use kind::PlotKind;
pub use render::render;
