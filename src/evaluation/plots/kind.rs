use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumMessage, EnumString, IntoStaticStr};
use tracing::debug;

/// Diagnostic plot a request may ask for.
///
/// Declaration order is the rendering order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
    EnumMessage,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum PlotKind {
    #[serde(alias = "Confusion Matrix")]
    #[strum(
        to_string = "confusion-matrix",
        serialize = "Confusion Matrix",
        serialize = "confusion_matrix",
        message = "Confusion Matrix"
    )]
    ConfusionMatrix,

    #[serde(alias = "ROC Curve")]
    #[strum(
        to_string = "roc-curve",
        serialize = "ROC Curve",
        serialize = "roc",
        message = "ROC Curve"
    )]
    RocCurve,

    #[serde(alias = "Precision-Recall Curve")]
    #[strum(
        to_string = "precision-recall-curve",
        serialize = "Precision-Recall Curve",
        serialize = "pr-curve",
        serialize = "pr",
        message = "Precision-Recall Curve"
    )]
    PrecisionRecallCurve,
}

impl PlotKind {
    /// Parses plot names, silently dropping unknown ones. Duplicates collapse
    /// and the result iterates in rendering order.
    pub fn parse_lenient<I, S>(names: I) -> BTreeSet<PlotKind>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref().trim();
                let parsed = PlotKind::from_str(name).ok();
                if parsed.is_none() {
                    debug!(name, "ignoring unknown plot kind");
                }
                parsed
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumMessage, IntoEnumIterator};

    #[test]
    fn accepts_display_labels_and_short_names() {
        assert_eq!(
            PlotKind::from_str("Confusion Matrix").unwrap(),
            PlotKind::ConfusionMatrix
        );
        assert_eq!(PlotKind::from_str("roc").unwrap(), PlotKind::RocCurve);
        assert_eq!(
            PlotKind::from_str("precision-recall-curve").unwrap(),
            PlotKind::PrecisionRecallCurve
        );
        assert_eq!(PlotKind::from_str("ROC-CURVE").unwrap(), PlotKind::RocCurve);
    }

    #[test]
    fn lenient_parse_ignores_unknown_and_orders() {
        let got = PlotKind::parse_lenient([
            "Precision-Recall Curve",
            "Lift Chart",
            "Confusion Matrix",
            "roc-curve",
            "confusion-matrix",
        ]);
        let got: Vec<_> = got.into_iter().collect();
        assert_eq!(
            got,
            vec![
                PlotKind::ConfusionMatrix,
                PlotKind::RocCurve,
                PlotKind::PrecisionRecallCurve
            ]
        );
        assert!(PlotKind::parse_lenient(["nope"]).is_empty());
    }

    #[test]
    fn menu_labels() {
        let labels: Vec<_> = PlotKind::iter().filter_map(|k| k.get_message()).collect();
        assert_eq!(
            labels,
            vec!["Confusion Matrix", "ROC Curve", "Precision-Recall Curve"]
        );
        assert_eq!(PlotKind::RocCurve.to_string(), "roc-curve");
    }

    #[test]
    fn serde_uses_kebab_case_and_accepts_labels() {
        let json = serde_json::to_string(&PlotKind::PrecisionRecallCurve).unwrap();
        assert_eq!(json, "\"precision-recall-curve\"");
        let back: PlotKind = serde_json::from_str("\"ROC Curve\"").unwrap();
        assert_eq!(back, PlotKind::RocCurve);
    }
}
