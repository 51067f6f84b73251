use crate::classifiers::knn::{Algorithm, Weights};
use crate::classifiers::svm::{Gamma, Kernel};
use crate::classifiers::{KNearestNeighbors, LogisticRegression, RandomForest, Svm, UntrainedModel};
use crate::error::ConfigurationError;
use crate::ui::types::choices::{
    ClassifierChoice, KnnAlgorithm, KnnParameters, KnnWeights, LogisticRegressionParameters,
    RandomForestParameters, SvmGamma, SvmKernel, SvmParameters,
};
use std::ops::RangeInclusive;

const C_RANGE: &str = "0.01 < C <= 10";

/// Validates the hyperparameters of `choice` and turns them into a model
/// ready to fit. Nothing is trained here.
pub fn build_classifier(choice: ClassifierChoice) -> Result<UntrainedModel, ConfigurationError> {
    Ok(match choice {
        ClassifierChoice::Svm(p) => UntrainedModel::Svm(p.try_into()?),
        ClassifierChoice::LogisticRegression(p) => UntrainedModel::LogisticRegression(p.try_into()?),
        ClassifierChoice::RandomForest(p) => UntrainedModel::RandomForest(p.try_into()?),
        ClassifierChoice::Knn(p) => UntrainedModel::Knn(p.try_into()?),
    })
}

fn check_c(c: f64) -> Result<f64, ConfigurationError> {
    if c.is_finite() && c > 0.01 && c <= 10.0 {
        Ok(c)
    } else {
        Err(ConfigurationError::out_of_range("C", c, C_RANGE))
    }
}

fn check_count(
    parameter: &'static str,
    value: usize,
    range: RangeInclusive<usize>,
    expected: &'static str,
) -> Result<usize, ConfigurationError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigurationError::out_of_range(parameter, value, expected))
    }
}

impl From<SvmKernel> for Kernel {
    fn from(kernel: SvmKernel) -> Self {
        match kernel {
            SvmKernel::Rbf => Kernel::Rbf,
            SvmKernel::Linear => Kernel::Linear,
        }
    }
}

impl From<SvmGamma> for Gamma {
    fn from(gamma: SvmGamma) -> Self {
        match gamma {
            SvmGamma::Scale => Gamma::Scale,
            SvmGamma::Auto => Gamma::Auto,
        }
    }
}

impl TryFrom<SvmParameters> for Svm {
    type Error = ConfigurationError;

    fn try_from(params: SvmParameters) -> Result<Self, Self::Error> {
        Ok(Svm::new(
            check_c(params.c)?,
            params.kernel.into(),
            params.gamma.into(),
        ))
    }
}

impl TryFrom<LogisticRegressionParameters> for LogisticRegression {
    type Error = ConfigurationError;

    fn try_from(params: LogisticRegressionParameters) -> Result<Self, Self::Error> {
        Ok(LogisticRegression::new(
            check_c(params.c)?,
            check_count("max_iter", params.max_iter, 100..=500, "100..=500")?,
        ))
    }
}

impl TryFrom<RandomForestParameters> for RandomForest {
    type Error = ConfigurationError;

    fn try_from(params: RandomForestParameters) -> Result<Self, Self::Error> {
        Ok(RandomForest::new(
            check_count("n_estimators", params.n_estimators, 100..=5000, "100..=5000")?,
            check_count("max_depth", params.max_depth, 1..=20, "1..=20")?,
            params.bootstrap,
        ))
    }
}

impl From<KnnAlgorithm> for Algorithm {
    fn from(algorithm: KnnAlgorithm) -> Self {
        match algorithm {
            KnnAlgorithm::Auto => Algorithm::Auto,
            KnnAlgorithm::BallTree => Algorithm::BallTree,
            KnnAlgorithm::KdTree => Algorithm::KdTree,
            KnnAlgorithm::Brute => Algorithm::Brute,
        }
    }
}

impl From<KnnWeights> for Weights {
    fn from(weights: KnnWeights) -> Self {
        match weights {
            KnnWeights::Uniform => Weights::Uniform,
            KnnWeights::Distance => Weights::Distance,
        }
    }
}

impl TryFrom<KnnParameters> for KNearestNeighbors {
    type Error = ConfigurationError;

    fn try_from(params: KnnParameters) -> Result<Self, Self::Error> {
        Ok(KNearestNeighbors::new(
            check_count("n_neighbors", params.n_neighbors, 1..=100, "1..=100")?,
            params.algorithm.into(),
            params.weights.into(),
            check_count("leaf_size", params.leaf_size, 10..=100, "10..=100")?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_build_every_kind() {
        let choices = [
            ClassifierChoice::Svm(SvmParameters::default()),
            ClassifierChoice::LogisticRegression(LogisticRegressionParameters::default()),
            ClassifierChoice::RandomForest(RandomForestParameters::default()),
            ClassifierChoice::Knn(KnnParameters::default()),
        ];
        let names: Vec<_> = choices
            .into_iter()
            .map(|c| build_classifier(c).unwrap().name())
            .collect();
        assert_eq!(
            names,
            vec!["SVM", "Logistic Regression", "Random Forest", "KNN"]
        );
    }

    #[test]
    fn parameters_carry_over() {
        let model = build_classifier(ClassifierChoice::Knn(KnnParameters {
            n_neighbors: 7,
            algorithm: KnnAlgorithm::BallTree,
            weights: KnnWeights::Distance,
            leaf_size: 40,
        }))
        .unwrap();
        assert_eq!(
            model,
            UntrainedModel::Knn(KNearestNeighbors::new(
                7,
                Algorithm::BallTree,
                Weights::Distance,
                40
            ))
        );
    }

    #[test]
    fn c_bounds_are_exclusive_below_inclusive_above() {
        for bad in [-1.0, 0.0, 0.01, 10.5, f64::NAN, f64::INFINITY] {
            let err = build_classifier(ClassifierChoice::Svm(SvmParameters {
                c: bad,
                ..SvmParameters::default()
            }))
            .unwrap_err();
            assert!(
                matches!(err, ConfigurationError::OutOfRange { parameter: "C", .. }),
                "C = {bad}"
            );
        }
        assert!(
            build_classifier(ClassifierChoice::Svm(SvmParameters {
                c: 10.0,
                ..SvmParameters::default()
            }))
            .is_ok()
        );
    }

    #[test]
    fn integer_ranges_are_enforced() {
        let err = build_classifier(ClassifierChoice::Knn(KnnParameters {
            n_neighbors: 0,
            ..KnnParameters::default()
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::out_of_range("n_neighbors", 0, "1..=100")
        );

        let err = build_classifier(ClassifierChoice::RandomForest(RandomForestParameters {
            max_depth: 21,
            ..RandomForestParameters::default()
        }))
        .unwrap_err();
        assert_eq!(err, ConfigurationError::out_of_range("max_depth", 21, "1..=20"));

        let err = build_classifier(ClassifierChoice::LogisticRegression(
            LogisticRegressionParameters {
                c: 1.0,
                max_iter: 99,
            },
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::OutOfRange { parameter: "max_iter", .. }
        ));
    }
}
