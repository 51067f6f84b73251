mod holdout_evaluator;
mod report;
mod session;
mod stage;

pub use holdout_evaluator::{EvaluationResult, HoldoutEvaluator, evaluate};
pub use report::EvaluationReport;
pub use session::Session;
pub use stage::{PipelineStage, Progress};
