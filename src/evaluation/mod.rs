mod evaluators;
mod measurement;
pub mod plots;

pub use evaluators::{
    BinaryClassificationEvaluator, ConfusionCounts, PerformanceEvaluator, PerformanceEvaluatorExt,
};
pub use measurement::Measurement;
