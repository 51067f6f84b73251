use std::path::PathBuf;
use thiserror::Error;

/// The dataset source is unreadable or cannot be encoded consistently.
///
/// Fatal for a session: nothing meaningful can run without a valid table.
#[derive(Debug, Error)]
pub enum DataFormatError {
    #[error("cannot read dataset {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed record {row}: {source}")]
    MalformedRecord {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("record {row} has {found} fields, expected {expected}")]
    RaggedRecord {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("missing value in column '{column}' at record {row}")]
    MissingValue { column: String, row: usize },

    #[error("value '{value}' in column '{column}' at record {row} is not in the column's vocabulary")]
    UnknownValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("dataset has no data rows")]
    Empty,

    #[error("target column '{0}' not found")]
    MissingTarget(String),

    #[error("target column '{column}' must have exactly two distinct values, found {found}")]
    NotBinary { column: String, found: usize },
}

/// Invalid user configuration: out-of-range hyperparameters, malformed
/// requests or unusable split settings. No training is attempted.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("{parameter} = {value} is out of range, expected {expected}")]
    OutOfRange {
        parameter: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("test fraction must lie in (0, 1), got {0}")]
    InvalidTestFraction(f64),

    #[error("split of {rows} rows with test fraction {test_fraction} leaves an empty partition")]
    EmptyPartition { rows: usize, test_fraction: f64 },

    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl ConfigurationError {
    pub(crate) fn out_of_range(
        parameter: &'static str,
        value: impl ToString,
        expected: &'static str,
    ) -> Self {
        Self::OutOfRange {
            parameter,
            value: value.to_string(),
            expected,
        }
    }
}

/// Numerical failure while fitting a model. Terminal for the request.
#[derive(Debug, Error, PartialEq)]
pub enum TrainingError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("features have {rows} rows but target has {targets} labels")]
    LengthMismatch { rows: usize, targets: usize },

    #[error("label {0} is not a binary class code")]
    NonBinaryLabel(usize),

    #[error("training set contains a single class ({0}); two are required")]
    SingleClass(usize),

    #[error("non-finite feature value at row {row}, column {column}")]
    NonFiniteFeature { row: usize, column: usize },

    #[error("n_neighbors = {k} exceeds the {samples} training samples")]
    TooFewSamples { k: usize, samples: usize },

    #[error("{model} failed to fit: {message}")]
    Backend {
        model: &'static str,
        message: String,
    },
}

/// Everything that can end a single classification request.
///
/// Both variants are reported to the user; neither aborts the session.
#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Training(#[from] TrainingError),
}

/// Failure to open a session on a dataset.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Failure writing plot artifacts to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write delimited file {path}: {source}")]
    Delimited {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot serialize {path} as JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
