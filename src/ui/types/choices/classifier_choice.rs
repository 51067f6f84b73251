use crate::ui::types::choices::UIChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_c() -> f64 {
    1.0
}

fn default_max_iter() -> usize {
    100
}

fn default_n_estimators() -> usize {
    100
}

fn default_max_depth() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_n_neighbors() -> usize {
    5
}

fn default_leaf_size() -> usize {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(ClassifierKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum ClassifierChoice {
    #[strum_discriminants(strum(
        message = "Support Vector Machine (SVM)",
        detailed_message = "Soft-margin SVC trained with SMO; linear or RBF kernel."
    ))]
    Svm(SvmParameters),

    #[strum_discriminants(strum(
        message = "Logistic Regression",
        detailed_message = "L2-penalized logistic model fitted with Newton steps."
    ))]
    LogisticRegression(LogisticRegressionParameters),

    #[strum_discriminants(strum(
        message = "Random Forest",
        detailed_message = "Bagged CART trees with Gini impurity."
    ))]
    RandomForest(RandomForestParameters),

    #[strum_discriminants(strum(
        message = "K-Nearest Neighbors (KNN)",
        detailed_message = "Majority or distance-weighted vote of the closest training rows."
    ))]
    Knn(KnnParameters),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SvmKernel {
    #[default]
    Rbf,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SvmGamma {
    #[default]
    Scale,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SvmParameters {
    #[serde(rename = "C", alias = "c", default = "default_c")]
    #[schemars(
        title = "C (Regularization parameter)",
        description = "Inverse regularization strength; smaller values widen the margin.",
        range(max = 10.0),
        extend("exclusiveMinimum" = 0.01),
        default = "default_c"
    )]
    pub c: f64,

    #[serde(default)]
    #[schemars(title = "Kernel", description = "Kernel function of the decision surface.")]
    pub kernel: SvmKernel,

    #[serde(default)]
    #[schemars(
        title = "Gamma (Kernel coefficient)",
        description = "RBF width: 'scale' uses 1/(d·Var(X)), 'auto' uses 1/d."
    )]
    pub gamma: SvmGamma,
}

impl Default for SvmParameters {
    fn default() -> Self {
        Self {
            c: default_c(),
            kernel: SvmKernel::default(),
            gamma: SvmGamma::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogisticRegressionParameters {
    #[serde(rename = "C", alias = "c", default = "default_c")]
    #[schemars(
        title = "C (Regularization parameter)",
        description = "Inverse regularization strength.",
        range(max = 10.0),
        extend("exclusiveMinimum" = 0.01),
        default = "default_c"
    )]
    pub c: f64,

    #[serde(default = "default_max_iter")]
    #[schemars(
        title = "Maximum number of iterations",
        description = "Newton iterations before giving up on convergence.",
        range(min = 100, max = 500),
        default = "default_max_iter"
    )]
    pub max_iter: usize,
}

impl Default for LogisticRegressionParameters {
    fn default() -> Self {
        Self {
            c: default_c(),
            max_iter: default_max_iter(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RandomForestParameters {
    #[serde(default = "default_n_estimators")]
    #[schemars(
        title = "Number of trees",
        description = "How many trees the forest grows.",
        range(min = 100, max = 5000),
        default = "default_n_estimators"
    )]
    pub n_estimators: usize,

    #[serde(default = "default_max_depth")]
    #[schemars(
        title = "Maximum depth",
        description = "Depth limit of every tree.",
        range(min = 1, max = 20),
        default = "default_max_depth"
    )]
    pub max_depth: usize,

    #[serde(default = "default_true")]
    #[schemars(
        title = "Bootstrap samples",
        description = "Train each tree on a bootstrap resample of the training rows?",
        default = "default_true"
    )]
    pub bootstrap: bool,
}

impl Default for RandomForestParameters {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            max_depth: default_max_depth(),
            bootstrap: default_true(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum KnnAlgorithm {
    #[default]
    Auto,
    BallTree,
    KdTree,
    Brute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum KnnWeights {
    #[default]
    Uniform,
    Distance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KnnParameters {
    #[serde(default = "default_n_neighbors")]
    #[schemars(
        title = "Number of neighbors",
        description = "Training rows consulted per prediction.",
        range(min = 1, max = 100),
        default = "default_n_neighbors"
    )]
    pub n_neighbors: usize,

    #[serde(default)]
    #[schemars(
        title = "Algorithm",
        description = "Neighbour search structure; 'auto' picks one from the data shape."
    )]
    pub algorithm: KnnAlgorithm,

    #[serde(default)]
    #[schemars(
        title = "Weights",
        description = "'uniform' votes equally, 'distance' by inverse distance."
    )]
    pub weights: KnnWeights,

    #[serde(default = "default_leaf_size")]
    #[schemars(
        title = "Leaf size",
        description = "Rows per leaf of the k-d or ball tree.",
        range(min = 10, max = 100),
        default = "default_leaf_size"
    )]
    pub leaf_size: usize,
}

impl Default for KnnParameters {
    fn default() -> Self {
        Self {
            n_neighbors: default_n_neighbors(),
            algorithm: KnnAlgorithm::default(),
            weights: KnnWeights::default(),
            leaf_size: default_leaf_size(),
        }
    }
}

impl ClassifierChoice {
    pub fn kind(&self) -> ClassifierKind {
        ClassifierKind::from(self)
    }

    /// Short name used in reports and progress, e.g. `SVM`.
    pub fn model_name(&self) -> &'static str {
        match self {
            ClassifierChoice::Svm(_) => "SVM",
            ClassifierChoice::LogisticRegression(_) => "Logistic Regression",
            ClassifierChoice::RandomForest(_) => "Random Forest",
            ClassifierChoice::Knn(_) => "KNN",
        }
    }
}

impl UIChoice for ClassifierChoice {
    type Kind = ClassifierKind;

    fn schema() -> Schema {
        schema_for!(ClassifierChoice)
    }

    fn prompt_label() -> &'static str {
        "Choose a classifier:"
    }

    fn default_params(kind: Self::Kind) -> Value {
        let params = match kind {
            ClassifierKind::Svm => serde_json::to_value(SvmParameters::default()),
            ClassifierKind::LogisticRegression => {
                serde_json::to_value(LogisticRegressionParameters::default())
            }
            ClassifierKind::RandomForest => serde_json::to_value(RandomForestParameters::default()),
            ClassifierKind::Knn => serde_json::to_value(KnnParameters::default()),
        };
        params.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::types::choices::{FieldKind, specs_for_kind};
    use serde_json::json;
    use strum::{EnumMessage, IntoEnumIterator};

    #[test]
    fn tagged_json_round_trip_uses_kebab_tags_and_capital_c() {
        let choice = ClassifierChoice::Svm(SvmParameters {
            c: 2.5,
            kernel: SvmKernel::Linear,
            gamma: SvmGamma::Auto,
        });
        let v = serde_json::to_value(&choice).unwrap();
        assert_eq!(
            v,
            json!({"type": "svm", "params": {"C": 2.5, "kernel": "linear", "gamma": "auto"}})
        );
        let back: ClassifierChoice = serde_json::from_value(v).unwrap();
        assert_eq!(back, choice);
    }

    #[test]
    fn missing_params_take_defaults() {
        let choice: ClassifierChoice =
            serde_json::from_value(json!({"type": "knn", "params": {}})).unwrap();
        assert_eq!(choice, ClassifierChoice::Knn(KnnParameters::default()));

        let choice: ClassifierChoice = serde_json::from_value(
            json!({"type": "logistic-regression", "params": {"c": 0.5}}),
        )
        .unwrap();
        assert_eq!(
            choice,
            ClassifierChoice::LogisticRegression(LogisticRegressionParameters {
                c: 0.5,
                max_iter: 100
            })
        );
    }

    #[test]
    fn kinds_carry_menu_labels() {
        let labels: Vec<_> = ClassifierKind::iter()
            .filter_map(|k| k.get_message())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Support Vector Machine (SVM)",
                "Logistic Regression",
                "Random Forest",
                "K-Nearest Neighbors (KNN)"
            ]
        );
        let key: &'static str = ClassifierKind::RandomForest.into();
        assert_eq!(key, "random-forest");
    }

    #[test]
    fn schema_exposes_ranges_and_choices() {
        let schema = ClassifierChoice::schema();

        let svm = specs_for_kind(&schema, "svm").unwrap();
        let names: Vec<_> = svm.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["C", "kernel", "gamma"]);
        assert_eq!(svm[0].kind, FieldKind::Number);
        assert_eq!(svm[0].max, Some(10.0));
        assert_eq!(svm[0].min, Some(0.01));
        assert!(svm[0].exclusive_min);
        assert_eq!(
            svm[1].kind,
            FieldKind::Choice(vec!["rbf".into(), "linear".into()])
        );

        let knn = specs_for_kind(&schema, "knn").unwrap();
        let algorithm = knn.iter().find(|s| s.name == "algorithm").unwrap();
        assert_eq!(
            algorithm.kind,
            FieldKind::Choice(vec![
                "auto".into(),
                "ball_tree".into(),
                "kd_tree".into(),
                "brute".into()
            ])
        );
        let leaf = knn.iter().find(|s| s.name == "leaf_size").unwrap();
        assert_eq!((leaf.min, leaf.max), (Some(10.0), Some(100.0)));

        let rf = specs_for_kind(&schema, "random-forest").unwrap();
        assert_eq!(rf[2].kind, FieldKind::Boolean);
    }

    #[test]
    fn default_params_match_parameter_defaults() {
        let v = ClassifierChoice::default_params(ClassifierKind::RandomForest);
        assert_eq!(
            v,
            json!({"n_estimators": 100, "max_depth": 10, "bootstrap": true})
        );
        let choice = ClassifierChoice::from_parts(ClassifierKind::Svm, json!({})).unwrap();
        assert_eq!(choice.kind(), ClassifierKind::Svm);
    }
}
