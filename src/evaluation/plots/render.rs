use crate::classifiers::Classifier;
use crate::core::dataset::ClassNames;
use crate::evaluation::plots::{
    ConfusionMatrixPlot, PlotArtifact, PlotKind, precision_recall_curve, roc_curve,
};
use crate::tasks::EvaluationResult;
use std::collections::BTreeSet;
use tracing::debug;

/// Builds the requested diagnostics for one evaluated model.
///
/// Artifacts come out in [`PlotKind`] order whatever order they were asked
/// in. The confusion matrix reuses the stored predictions; the curves score
/// the test partition once with the trained model, which is never refit.
pub fn render(
    requested: &BTreeSet<PlotKind>,
    evaluation: &EvaluationResult<'_>,
    class_names: &ClassNames,
) -> Vec<PlotArtifact> {
    let needs_scores = requested.contains(&PlotKind::RocCurve)
        || requested.contains(&PlotKind::PrecisionRecallCurve);
    let scores: Vec<f64> = if needs_scores {
        evaluation
            .model()
            .decision_scores(evaluation.test_features())
            .to_vec()
    } else {
        Vec::new()
    };
    let truth: Vec<usize> = evaluation.test_target().to_vec();

    requested
        .iter()
        .map(|kind| {
            debug!(%kind, "rendering plot");
            match kind {
                PlotKind::ConfusionMatrix => PlotArtifact::ConfusionMatrix(ConfusionMatrixPlot::new(
                    evaluation.confusion(),
                    class_names.clone(),
                )),
                PlotKind::RocCurve => PlotArtifact::RocCurve(roc_curve(&scores, &truth)),
                PlotKind::PrecisionRecallCurve => {
                    PlotArtifact::PrecisionRecallCurve(precision_recall_curve(&scores, &truth))
                }
            }
        })
        .collect()
}
