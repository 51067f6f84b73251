//! Binary soft-margin support vector classifier on top of `linfa-svm`.

use crate::classifiers::classifier::check_training_data;
use crate::classifiers::{Classifier, Learner, ScoreKind};
use crate::error::TrainingError;
use linfa::DatasetBase;
use linfa::prelude::Pr;
use linfa::traits::{Fit, Predict};
use linfa_svm::Svm as LinfaSvm;
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::fmt::{Display, Formatter};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Linear,
    Rbf,
}

/// How the RBF width is derived from the training matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gamma {
    /// `1 / (d · Var(X))`.
    Scale,
    /// `1 / d`.
    Auto,
}

impl Gamma {
    pub fn resolve(self, x: ArrayView2<'_, f64>) -> f64 {
        let d = x.ncols().max(1) as f64;
        match self {
            Gamma::Auto => 1.0 / d,
            Gamma::Scale => {
                let var = x.var(0.0);
                if var > 0.0 { 1.0 / (d * var) } else { 1.0 }
            }
        }
    }
}

/// SVM hyperparameters. `c` must already be validated as positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Svm {
    pub c: f64,
    pub kernel: Kernel,
    pub gamma: Gamma,
}

impl Svm {
    pub fn new(c: f64, kernel: Kernel, gamma: Gamma) -> Self {
        Self { c, kernel, gamma }
    }
}

impl Display for Svm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let kernel = match self.kernel {
            Kernel::Linear => "linear",
            Kernel::Rbf => "rbf",
        };
        let gamma = match self.gamma {
            Gamma::Scale => "scale",
            Gamma::Auto => "auto",
        };
        write!(f, "(C={}, kernel={kernel}, gamma={gamma})", self.c)
    }
}

impl Learner for Svm {
    type Model = SvmModel;

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, usize>,
    ) -> Result<SvmModel, TrainingError> {
        check_training_data(x, y)?;
        let backend = |e: &dyn std::fmt::Display| TrainingError::Backend {
            model: "SVM",
            message: e.to_string(),
        };

        let params = LinfaSvm::<_, Pr>::params().pos_neg_weights(self.c, self.c);
        let params = match self.kernel {
            Kernel::Linear => params.linear_kernel(),
            // linfa's Gaussian kernel is exp(-‖x−y‖² / eps)
            Kernel::Rbf => params.gaussian_kernel(1.0 / self.gamma.resolve(x)),
        };

        let dataset = DatasetBase::from(x.to_owned()).with_targets(y.to_owned());
        let tasks = dataset.one_vs_all().map_err(|e| backend(&e))?;
        let (_, positive_vs_rest) = tasks
            .into_iter()
            .find(|(label, _)| *label == 1)
            .ok_or(TrainingError::SingleClass(0))?;
        let model = params.fit(&positive_vs_rest).map_err(|e| backend(&e))?;

        debug!(
            support_vectors = model.nsupport(),
            rows = x.nrows(),
            "SVM fitted"
        );
        Ok(SvmModel { model })
    }
}

/// Fitted SVM with Platt-scaled outputs.
#[derive(Debug)]
pub struct SvmModel {
    model: LinfaSvm<f64, Pr>,
}

impl SvmModel {
    pub fn n_support(&self) -> usize {
        self.model.nsupport()
    }
}

impl Classifier for SvmModel {
    /// Platt-calibrated `P(y = 1)`.
    fn decision_scores(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        let records = DatasetBase::from(x.to_owned());
        let probabilities: Array1<Pr> = self.model.predict(&records);
        probabilities.mapv(|p| f64::from(*p))
    }

    fn score_kind(&self) -> ScoreKind {
        ScoreKind::PositiveProbability
    }
}
