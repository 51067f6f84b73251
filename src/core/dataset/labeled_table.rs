use crate::core::attributes::NominalAttribute;
use ndarray::{Array1, Array2};
use serde::Serialize;

/// Name of the binary target column in the mushroom data.
pub const TARGET_COLUMN: &str = "type";

/// Encoded features and binary target, row-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    pub features: Array2<f64>,
    pub target: Array1<usize>,
    pub feature_names: Vec<String>,
    pub target_attribute: NominalAttribute,
}

impl LabeledTable {
    pub(crate) fn new(
        features: Array2<f64>,
        target: Array1<usize>,
        feature_names: Vec<String>,
        target_attribute: NominalAttribute,
    ) -> Self {
        debug_assert_eq!(features.nrows(), target.len());
        Self {
            features,
            target,
            feature_names,
            target_attribute,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.target.len()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn class_names(&self) -> ClassNames {
        ClassNames::from_attribute(&self.target_attribute)
    }
}

/// Display names for encoded labels 0 and 1.
///
/// Built from the target encoder itself, so `name(code)` always names the
/// raw value that was encoded as `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassNames([String; 2]);

impl ClassNames {
    pub fn new(negative: impl Into<String>, positive: impl Into<String>) -> Self {
        Self([negative.into(), positive.into()])
    }

    pub fn from_attribute(attribute: &NominalAttribute) -> Self {
        let name = |code: usize| {
            attribute
                .decode(code)
                .map_or_else(|| code.to_string(), |raw| display_name(raw).to_string())
        };
        Self([name(0), name(1)])
    }

    pub fn name(&self, code: usize) -> &str {
        self.0.get(code).map_or("?", String::as_str)
    }

    pub fn negative(&self) -> &str {
        &self.0[0]
    }

    pub fn positive(&self) -> &str {
        &self.0[1]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

fn display_name(raw: &str) -> &str {
    match raw {
        "e" => "edible",
        "p" => "poisonous",
        other => other,
    }
}
