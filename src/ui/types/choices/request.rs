use crate::error::ConfigurationError;
use crate::evaluation::plots::PlotKind;
use crate::ui::types::choices::ClassifierChoice;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// One classification run: which classifier, how it is configured and which
/// diagnostics to draw.
///
/// ```json
/// {
///   "classifier": {"type": "svm", "params": {"C": 1.0, "kernel": "rbf", "gamma": "scale"}},
///   "plots": ["Confusion Matrix", "roc-curve"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub classifier: ClassifierChoice,

    /// Unknown names are dropped, duplicates collapse.
    #[serde(default, deserialize_with = "lenient_plots")]
    pub plots: BTreeSet<PlotKind>,
}

impl ClassificationRequest {
    pub fn new(classifier: ClassifierChoice, plots: BTreeSet<PlotKind>) -> Self {
        Self { classifier, plots }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(s).map_err(|e| ConfigurationError::MalformedRequest(e.to_string()))
    }
}

fn lenient_plots<'de, D>(deserializer: D) -> Result<BTreeSet<PlotKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<String>::deserialize(deserializer)?;
    Ok(PlotKind::parse_lenient(names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::types::choices::{KnnParameters, SvmKernel};

    #[test]
    fn parses_labels_and_ignores_unknown_plots() {
        let req = ClassificationRequest::from_json_str(
            r#"{
                "classifier": {"type": "svm", "params": {"C": 0.5, "kernel": "linear"}},
                "plots": ["ROC Curve", "Lift Chart", "confusion-matrix", "roc"]
            }"#,
        )
        .unwrap();

        let ClassifierChoice::Svm(params) = &req.classifier else {
            panic!("expected svm, got {:?}", req.classifier);
        };
        assert_eq!(params.c, 0.5);
        assert_eq!(params.kernel, SvmKernel::Linear);
        assert_eq!(
            req.plots.into_iter().collect::<Vec<_>>(),
            vec![PlotKind::ConfusionMatrix, PlotKind::RocCurve]
        );
    }

    #[test]
    fn plots_default_to_none() {
        let req =
            ClassificationRequest::from_json_str(r#"{"classifier": {"type": "knn", "params": {}}}"#)
                .unwrap();
        assert_eq!(req.classifier, ClassifierChoice::Knn(KnnParameters::default()));
        assert!(req.plots.is_empty());
    }

    #[test]
    fn malformed_json_is_a_configuration_error() {
        let err = ClassificationRequest::from_json_str(r#"{"classifier": {"type": "tree"}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::MalformedRequest(_)));
    }
}
