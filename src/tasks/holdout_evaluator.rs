use crate::classifiers::{Classifier, TrainedModel, UntrainedModel};
use crate::core::dataset::Split;
use crate::error::TrainingError;
use crate::evaluation::{
    BinaryClassificationEvaluator, ConfusionCounts, Measurement, PerformanceEvaluator,
    PerformanceEvaluatorExt,
};
use crate::evaluation::plots::PlotArtifact;
use crate::tasks::{EvaluationReport, PipelineStage, Progress};
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::sync::mpsc::Sender;
use std::time::Instant;
use tracing::info;

/// Fits a model on the training partition of a [`Split`] and scores it on
/// the test partition.
pub struct HoldoutEvaluator<'s> {
    split: &'s Split,
    progress_tx: Option<Sender<Progress>>,
}

impl<'s> HoldoutEvaluator<'s> {
    pub fn new(split: &'s Split) -> Self {
        Self {
            split,
            progress_tx: None,
        }
    }

    pub fn with_progress(mut self, tx: Sender<Progress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn run(&self, model: UntrainedModel) -> Result<EvaluationResult<'s>, TrainingError> {
        let start = Instant::now();
        let name = model.name();
        let description = model.to_string();
        let (train_x, train_y) = self.split.train();
        let (test_x, test_y) = self.split.test();

        self.report(PipelineStage::Training, name, start);
        let model = model.fit(train_x, train_y)?;
        let fit_seconds = start.elapsed().as_secs_f64();
        info!(classifier = name, fit_seconds, rows = train_y.len(), "model trained");

        self.report(PipelineStage::Evaluating, name, start);
        let predict_start = Instant::now();
        let predictions = model.predict(test_x);
        let predict_seconds = predict_start.elapsed().as_secs_f64();

        let mut evaluator = BinaryClassificationEvaluator::new();
        evaluator.add_results(test_y.iter().copied(), predictions.iter().copied());
        let measurements = evaluator.performance();
        info!(
            classifier = name,
            accuracy = evaluator.metric("accuracy"),
            precision = evaluator.metric("precision"),
            recall = evaluator.metric("recall"),
            predict_seconds,
            "model evaluated"
        );

        Ok(EvaluationResult {
            description,
            model,
            predictions,
            test_features: test_x,
            test_target: test_y,
            measurements,
            confusion: evaluator.confusion(),
            fit_seconds,
            predict_seconds,
        })
    }

    fn report(&self, stage: PipelineStage, classifier: &'static str, start: Instant) {
        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(Progress {
                stage,
                classifier,
                elapsed_seconds: start.elapsed().as_secs_f64(),
            });
        }
    }
}

/// [`HoldoutEvaluator::run`] without progress reporting.
pub fn evaluate(model: UntrainedModel, split: &Split) -> Result<EvaluationResult<'_>, TrainingError> {
    HoldoutEvaluator::new(split).run(model)
}

/// A trained model together with its test-set predictions and metrics.
///
/// Borrows the test partition it was scored on; metrics are unrounded.
#[derive(Debug)]
pub struct EvaluationResult<'s> {
    description: String,
    model: TrainedModel,
    predictions: Array1<usize>,
    test_features: ArrayView2<'s, f64>,
    test_target: ArrayView1<'s, usize>,
    measurements: Vec<Measurement>,
    confusion: ConfusionCounts,
    fit_seconds: f64,
    predict_seconds: f64,
}

impl<'s> EvaluationResult<'s> {
    /// Classifier name and hyperparameters, e.g. `SVM (C=1, kernel=rbf, gamma=scale)`.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    pub fn into_model(self) -> TrainedModel {
        self.model
    }

    pub fn predictions(&self) -> ArrayView1<'_, usize> {
        self.predictions.view()
    }

    pub fn test_features(&self) -> ArrayView2<'s, f64> {
        self.test_features
    }

    pub fn test_target(&self) -> ArrayView1<'s, usize> {
        self.test_target
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.measurements
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.value)
    }

    pub fn accuracy(&self) -> f64 {
        self.confusion.accuracy()
    }

    pub fn precision(&self) -> f64 {
        self.confusion.precision()
    }

    pub fn recall(&self) -> f64 {
        self.confusion.recall()
    }

    pub fn confusion(&self) -> &ConfusionCounts {
        &self.confusion
    }

    pub fn fit_seconds(&self) -> f64 {
        self.fit_seconds
    }

    pub fn predict_seconds(&self) -> f64 {
        self.predict_seconds
    }

    /// UI-facing summary with metrics rounded to two places.
    pub fn report(&self, plots: Vec<PlotArtifact>) -> EvaluationReport {
        EvaluationReport::new(
            self.description.clone(),
            self.accuracy(),
            self.precision(),
            self.recall(),
            plots,
        )
    }
}
