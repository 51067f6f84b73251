mod binary_classification_evaluator;
mod performance_evaluator;

pub use binary_classification_evaluator::{BinaryClassificationEvaluator, ConfusionCounts};
pub use performance_evaluator::{PerformanceEvaluator, PerformanceEvaluatorExt};
