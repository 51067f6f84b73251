use strum_macros::{Display, IntoStaticStr};

/// Where a classification request currently is.
///
/// Every request walks `Idle → Building → Training → Evaluating → Rendering`
/// and ends back in `Idle`, whether it succeeds or fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum PipelineStage {
    Idle,
    Building,
    Training,
    Evaluating,
    Rendering,
}

/// Stage transition sent on a progress channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub stage: PipelineStage,
    pub classifier: &'static str,
    pub elapsed_seconds: f64,
}
