use crate::core::dataset::{
    ClassNames, Dataset, LabeledTable, Split, SplitConfig, TARGET_COLUMN, load, split_with,
};
use crate::error::{ConfigurationError, EvaluationError, SessionError};
use crate::evaluation::plots::render;
use crate::tasks::{EvaluationReport, EvaluationResult, HoldoutEvaluator, PipelineStage, Progress};
use crate::ui::types::build::build_classifier;
use crate::ui::types::choices::{ClassificationRequest, ClassifierChoice};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Instant;
use tracing::{info, info_span, warn};

/// Loaded dataset, its encoded table and the train/test split, kept for as
/// long as the data path and split settings stay the same.
///
/// Requests only borrow the split, so any number of them can run one after
/// the other without reloading or re-splitting.
pub struct Session {
    data_path: PathBuf,
    split_config: SplitConfig,
    dataset: Dataset,
    table: LabeledTable,
    split: Split,
    progress_tx: Option<Sender<Progress>>,
}

struct Prepared {
    dataset: Dataset,
    table: LabeledTable,
    split: Split,
}

fn prepare(path: &Path, config: SplitConfig) -> Result<Prepared, SessionError> {
    let dataset = load(path)?;
    let table = dataset.labeled(TARGET_COLUMN)?;
    let split = split_with(&table, config)?;
    info!(
        path = %path.display(),
        rows = table.n_rows(),
        features = table.n_features(),
        train = split.n_train(),
        test = split.n_test(),
        "dataset ready"
    );
    Ok(Prepared {
        dataset,
        table,
        split,
    })
}

impl Session {
    /// Opens `path` with the default 70/30 split and seed 0.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        Self::open_with(path, SplitConfig::default())
    }

    pub fn open_with<P: AsRef<Path>>(path: P, config: SplitConfig) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let Prepared {
            dataset,
            table,
            split,
        } = prepare(path, config)?;
        Ok(Self {
            data_path: path.to_path_buf(),
            split_config: config,
            dataset,
            table,
            split,
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<Progress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Switches to `path` if it differs from the current one. Returns whether
    /// anything was reloaded; on error the previous state is kept.
    pub fn ensure_dataset<P: AsRef<Path>>(&mut self, path: P) -> Result<bool, SessionError> {
        let path = path.as_ref();
        if path == self.data_path {
            return Ok(false);
        }
        let prepared = prepare(path, self.split_config)?;
        self.install(prepared);
        self.data_path = path.to_path_buf();
        Ok(true)
    }

    /// Re-splits the current table when `config` differs from the current
    /// settings. Returns whether the split changed; on error nothing changes.
    pub fn set_split_config(&mut self, config: SplitConfig) -> Result<bool, ConfigurationError> {
        if config == self.split_config {
            return Ok(false);
        }
        self.split = split_with(&self.table, config)?;
        self.split_config = config;
        info!(
            test_fraction = config.test_fraction,
            seed = config.seed,
            train = self.split.n_train(),
            test = self.split.n_test(),
            "split changed"
        );
        Ok(true)
    }

    fn install(&mut self, prepared: Prepared) {
        self.dataset = prepared.dataset;
        self.table = prepared.table;
        self.split = prepared.split;
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn split_config(&self) -> SplitConfig {
        self.split_config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn table(&self) -> &LabeledTable {
        &self.table
    }

    pub fn split(&self) -> &Split {
        &self.split
    }

    pub fn class_names(&self) -> ClassNames {
        self.table.class_names()
    }

    /// Builds, fits and scores one classifier on the session's split.
    pub fn evaluate(
        &self,
        choice: &ClassifierChoice,
    ) -> Result<EvaluationResult<'_>, EvaluationError> {
        let start = Instant::now();
        self.report(PipelineStage::Building, choice.model_name(), start);
        let model = build_classifier(choice.clone())?;

        let mut evaluator = HoldoutEvaluator::new(&self.split);
        if let Some(tx) = &self.progress_tx {
            evaluator = evaluator.with_progress(tx.clone());
        }
        Ok(evaluator.run(model)?)
    }

    /// Runs a whole request: build, fit, score and render the requested
    /// plots. Always ends in [`PipelineStage::Idle`].
    pub fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<EvaluationReport, EvaluationError> {
        let name = request.classifier.model_name();
        let span = info_span!("classify", classifier = name);
        let _guard = span.enter();
        let start = Instant::now();

        let outcome = self.evaluate(&request.classifier).map(|evaluation| {
            self.report(PipelineStage::Rendering, name, start);
            let plots = render(&request.plots, &evaluation, &self.class_names());
            evaluation.report(plots)
        });

        match &outcome {
            Ok(report) => info!(
                accuracy = report.accuracy,
                precision = report.precision,
                recall = report.recall,
                plots = report.plots.len(),
                seconds = start.elapsed().as_secs_f64(),
                "request finished"
            ),
            Err(e) => warn!(error = %e, "request failed"),
        }
        self.report(PipelineStage::Idle, name, start);
        outcome
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
