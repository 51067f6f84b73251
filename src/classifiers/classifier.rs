use crate::classifiers::{KNearestNeighbors, LogisticRegression, RandomForest, Svm};
use crate::error::TrainingError;
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::fmt::{Display, Formatter};

/// What the continuous output of [`Classifier::decision_scores`] means.
///
/// Both kinds rank test rows by confidence in the positive class, which is
/// all the ROC and precision-recall curves need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    /// Signed margin; positive class when `> 0`.
    DecisionFunction,
    /// Estimated `P(y = 1)`; positive class when `> 0.5`.
    PositiveProbability,
}

impl ScoreKind {
    pub fn threshold(self) -> f64 {
        match self {
            ScoreKind::DecisionFunction => 0.0,
            ScoreKind::PositiveProbability => 0.5,
        }
    }
}

/// A fitted binary model.
pub trait Classifier: Send + Sync {
    /// One continuous score per row, higher meaning more positive.
    fn decision_scores(&self, x: ArrayView2<'_, f64>) -> Array1<f64>;

    fn score_kind(&self) -> ScoreKind;

    /// Hard labels in `{0, 1}`.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<usize> {
        let threshold = self.score_kind().threshold();
        self.decision_scores(x)
            .mapv(|s| usize::from(s > threshold))
    }

    /// Mean accuracy: fraction of rows whose prediction equals `y`.
    fn score(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, usize>) -> f64 {
        if y.is_empty() {
            return 0.0;
        }
        let predictions = self.predict(x);
        let hits = predictions
            .iter()
            .zip(y.iter())
            .filter(|(p, t)| p == t)
            .count();
        hits as f64 / y.len() as f64
    }
}

/// A validated, untrained configuration that can fit a [`Classifier`].
pub trait Learner {
    type Model: Classifier + 'static;

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, usize>,
    ) -> Result<Self::Model, TrainingError>;
}

/// Shared preconditions of every learner: aligned, non-empty, finite input
/// and both classes present.
pub(crate) fn check_training_data(
    x: ArrayView2<'_, f64>,
    y: ArrayView1<'_, usize>,
) -> Result<(), TrainingError> {
    if x.nrows() != y.len() {
        return Err(TrainingError::LengthMismatch {
            rows: x.nrows(),
            targets: y.len(),
        });
    }
    if y.is_empty() {
        return Err(TrainingError::EmptyTrainingSet);
    }
    for ((row, column), v) in x.indexed_iter() {
        if !v.is_finite() {
            return Err(TrainingError::NonFiniteFeature { row, column });
        }
    }

    let mut counts = [0usize; 2];
    for &label in y {
        match counts.get_mut(label) {
            Some(c) => *c += 1,
            None => return Err(TrainingError::NonBinaryLabel(label)),
        }
    }
    match counts {
        [0, _] => Err(TrainingError::SingleClass(1)),
        [_, 0] => Err(TrainingError::SingleClass(0)),
        _ => Ok(()),
    }
}

/// A registered classifier with validated hyperparameters, ready to fit.
#[derive(Debug, Clone, PartialEq)]
pub enum UntrainedModel {
    Svm(Svm),
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForest),
    Knn(KNearestNeighbors),
}

impl UntrainedModel {
    pub fn name(&self) -> &'static str {
        match self {
            UntrainedModel::Svm(_) => "SVM",
            UntrainedModel::LogisticRegression(_) => "Logistic Regression",
            UntrainedModel::RandomForest(_) => "Random Forest",
            UntrainedModel::Knn(_) => "KNN",
        }
    }

    /// Fits on `(x, y)`, consuming the configuration.
    pub fn fit(
        self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, usize>,
    ) -> Result<TrainedModel, TrainingError> {
        let name = self.name();
        let model: Box<dyn Classifier> = match self {
            UntrainedModel::Svm(l) => Box::new(l.fit(x, y)?),
            UntrainedModel::LogisticRegression(l) => Box::new(l.fit(x, y)?),
            UntrainedModel::RandomForest(l) => Box::new(l.fit(x, y)?),
            UntrainedModel::Knn(l) => Box::new(l.fit(x, y)?),
        };
        Ok(TrainedModel { name, model })
    }
}

impl Display for UntrainedModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UntrainedModel::Svm(l) => write!(f, "{} {l}", self.name()),
            UntrainedModel::LogisticRegression(l) => write!(f, "{} {l}", self.name()),
            UntrainedModel::RandomForest(l) => write!(f, "{} {l}", self.name()),
            UntrainedModel::Knn(l) => write!(f, "{} {l}", self.name()),
        }
    }
}

/// A fitted model of any registered kind.
pub struct TrainedModel {
    name: &'static str,
    model: Box<dyn Classifier>,
}

impl TrainedModel {
    pub fn new<C: Classifier + 'static>(name: &'static str, model: C) -> Self {
        Self {
            name,
            model: Box::new(model),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedModel")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Classifier for TrainedModel {
    fn decision_scores(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        self.model.decision_scores(x)
    }

    fn score_kind(&self) -> ScoreKind {
        self.model.score_kind()
    }

    fn predict(&self, x: ArrayView2<'_, f64>) -> Array1<usize> {
        self.model.predict(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stubs::ScriptedClassifier;
    use ndarray::array;

    #[test]
    fn training_data_checks() {
        let x = array![[0.0], [1.0]];
        assert_eq!(check_training_data(x.view(), array![0, 1].view()), Ok(()));
        assert_eq!(
            check_training_data(x.view(), array![0].view()),
            Err(TrainingError::LengthMismatch { rows: 2, targets: 1 })
        );
        assert_eq!(
            check_training_data(x.view(), array![1, 1].view()),
            Err(TrainingError::SingleClass(1))
        );
        assert_eq!(
            check_training_data(x.view(), array![0, 2].view()),
            Err(TrainingError::NonBinaryLabel(2))
        );
        let bad = array![[0.0], [f64::NAN]];
        assert_eq!(
            check_training_data(bad.view(), array![0, 1].view()),
            Err(TrainingError::NonFiniteFeature { row: 1, column: 0 })
        );
        let empty = ndarray::Array2::<f64>::zeros((0, 3));
        assert_eq!(
            check_training_data(empty.view(), ndarray::Array1::<usize>::zeros(0).view()),
            Err(TrainingError::EmptyTrainingSet)
        );
    }

    #[test]
    fn thresholds_follow_score_kind() {
        assert_eq!(ScoreKind::DecisionFunction.threshold(), 0.0);
        assert_eq!(ScoreKind::PositiveProbability.threshold(), 0.5);

        let x = ndarray::Array2::<f64>::zeros((3, 1));
        let margin = ScriptedClassifier::new(vec![-0.5, 0.5, 0.0], ScoreKind::DecisionFunction);
        assert_eq!(margin.predict(x.view()), array![0, 1, 0]);
        let proba = ScriptedClassifier::new(vec![0.4, 0.6, 0.5], ScoreKind::PositiveProbability);
        assert_eq!(proba.predict(x.view()), array![0, 1, 0]);
    }

    #[test]
    fn score_is_mean_accuracy() {
        let x = ndarray::Array2::<f64>::zeros((4, 2));
        let model = ScriptedClassifier::new(vec![1.0], ScoreKind::DecisionFunction);
        assert_eq!(model.score(x.view(), array![1, 1, 0, 1].view()), 0.75);
        let none = ndarray::Array2::<f64>::zeros((0, 2));
        assert_eq!(model.score(none.view(), ndarray::Array1::<usize>::zeros(0).view()), 0.0);
    }

    #[test]
    fn trained_model_delegates_to_the_boxed_classifier() {
        let model = TrainedModel::new(
            "stub",
            ScriptedClassifier::new(vec![0.9, 0.1], ScoreKind::PositiveProbability),
        );
        let x = ndarray::Array2::<f64>::zeros((2, 1));
        assert_eq!(model.name(), "stub");
        assert_eq!(model.score_kind(), ScoreKind::PositiveProbability);
        assert_eq!(model.decision_scores(x.view()), array![0.9, 0.1]);
        assert_eq!(model.predict(x.view()), array![1, 0]);
        assert_eq!(format!("{model:?}"), "TrainedModel { name: \"stub\", .. }");
    }
}
