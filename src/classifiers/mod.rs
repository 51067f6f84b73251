pub mod classifier;
pub mod knn;
mod logistic_regression;
pub mod random_forest;
pub mod svm;

pub use classifier::{Classifier, Learner, ScoreKind, TrainedModel, UntrainedModel};
pub use knn::KNearestNeighbors;
pub use logistic_regression::{LogisticRegression, LogisticRegressionModel};
pub use random_forest::RandomForest;
pub use svm::Svm;
