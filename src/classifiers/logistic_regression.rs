use crate::classifiers::classifier::check_training_data;
use crate::classifiers::{Classifier, Learner, ScoreKind};
use crate::error::TrainingError;
use linfa::DatasetBase;
use linfa::traits::Fit;
use linfa_logistic::LogisticRegression as LinfaLogisticRegression;
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::fmt::{Display, Formatter};
use tracing::debug;

const DEFAULT_TOLERANCE: f64 = 1e-4;

/// L2-penalized logistic regression with an unpenalized intercept.
///
/// Minimizes `½‖w‖² + C · Σ logloss`, i.e. linfa's objective with
/// `alpha = 1 / C`. `c` and `max_iter` must already be validated.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl LogisticRegression {
    pub fn new(c: f64, max_iter: usize) -> Self {
        Self {
            c,
            max_iter,
            tol: DEFAULT_TOLERANCE,
        }
    }
}

impl Display for LogisticRegression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(C={}, max_iter={})", self.c, self.max_iter)
    }
}

impl Learner for LogisticRegression {
    type Model = LogisticRegressionModel;

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, usize>,
    ) -> Result<LogisticRegressionModel, TrainingError> {
        check_training_data(x, y)?;

        let dataset = DatasetBase::from(x.to_owned()).with_targets(y.to_owned());
        // the larger class (code 1) is linfa's positive label
        let fitted = LinfaLogisticRegression::default()
            .alpha(1.0 / self.c)
            .with_intercept(true)
            .max_iterations(self.max_iter as u64)
            .gradient_tolerance(self.tol)
            .fit(&dataset)
            .map_err(|e| TrainingError::Backend {
                model: "Logistic Regression",
                message: e.to_string(),
            })?;

        let weights = fitted.params().to_owned();
        let intercept = fitted.intercept();
        if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(TrainingError::Backend {
                model: "Logistic Regression",
                message: "non-finite coefficients".into(),
            });
        }
        debug!(intercept, rows = x.nrows(), "logistic regression fitted");
        Ok(LogisticRegressionModel { weights, intercept })
    }
}

#[derive(Debug, Clone)]
pub struct LogisticRegressionModel {
    weights: Array1<f64>,
    intercept: f64,
}

impl LogisticRegressionModel {
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// `P(y = 1 | x)` per row.
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        self.decision_scores(x).mapv(|z| 1.0 / (1.0 + (-z).exp()))
    }
}

impl Classifier for LogisticRegressionModel {
    fn decision_scores(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        x.dot(&self.weights) + self.intercept
    }

    fn score_kind(&self) -> ScoreKind {
        ScoreKind::DecisionFunction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::labeled_table;
    use ndarray::array;

    #[test]
    fn learns_a_one_dimensional_boundary() {
        let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0]];
        let y = array![0, 0, 0, 1, 1, 1];
        let model = LogisticRegression::new(1.0, 100)
            .fit(x.view(), y.view())
            .unwrap();
        assert_eq!(model.predict(x.view()), y);
        assert!(model.weights()[0] > 0.0);

        let p = model.predict_proba(array![[2.5]].view());
        assert!((p[0] - 0.5).abs() < 0.05, "p = {}", p[0]);
    }

    #[test]
    fn positive_class_is_code_one_even_when_rarer() {
        let x = array![[0.0], [0.5], [1.0], [1.5], [2.0], [6.0], [7.0]];
        let y = array![0, 0, 0, 0, 0, 1, 1];
        let model = LogisticRegression::new(1.0, 100)
            .fit(x.view(), y.view())
            .unwrap();
        let p = model.predict_proba(array![[0.0], [7.0]].view());
        assert!(p[0] < 0.5 && p[1] > 0.5, "{p}");
    }

    #[test]
    fn stronger_penalty_shrinks_weights() {
        let table = labeled_table(200, 1);
        let loose = LogisticRegression::new(10.0, 200)
            .fit(table.features.view(), table.target.view())
            .unwrap();
        let tight = LogisticRegression::new(0.02, 200)
            .fit(table.features.view(), table.target.view())
            .unwrap();
        let norm = |m: &LogisticRegressionModel| m.weights().dot(&m.weights());
        assert!(norm(&tight) < norm(&loose));
    }

    #[test]
    fn gradient_is_small_at_the_optimum() {
        let x = array![[0.0, 1.0], [1.0, 0.0], [1.0, 1.0], [2.0, 1.0], [0.0, 0.0]];
        let y = array![0, 1, 0, 1, 0];
        let lr = LogisticRegression::new(1.0, 200);
        let model = lr.fit(x.view(), y.view()).unwrap();

        let p = model.predict_proba(x.view());
        let residual = &p - &y.mapv(|l| l as f64);
        let grad_w = &model.weights + &(x.t().dot(&residual) * lr.c);
        assert!(grad_w.iter().all(|g| g.abs() < 1e-2), "{grad_w}");
        assert!((lr.c * residual.sum()).abs() < 1e-2);
    }

    #[test]
    fn fits_categorical_data() {
        let table = labeled_table(300, 2);
        let model = LogisticRegression::new(1.0, 100)
            .fit(table.features.view(), table.target.view())
            .unwrap();
        assert!(model.score(table.features.view(), table.target.view()) > 0.85);
    }
}
