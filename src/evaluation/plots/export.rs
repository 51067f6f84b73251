use crate::error::ExportError;
use crate::evaluation::plots::PlotArtifact;
use chrono::{DateTime, Local};
use clap::ValueEnum;
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }
}

/// Writes one artifact to `path`.
pub fn export_artifact<P: AsRef<Path>>(
    artifact: &PlotArtifact,
    path: P,
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => export_delimited(artifact, path.as_ref(), b','),
        ExportFormat::Tsv => export_delimited(artifact, path.as_ref(), b'\t'),
        ExportFormat::Json => export_json(artifact, path.as_ref()),
    }
}

/// Writes every artifact into `dir` as `<prefix>-<kind>-<timestamp>.<ext>`
/// and returns the written paths in artifact order.
pub fn export_all<P: AsRef<Path>>(
    artifacts: &[PlotArtifact],
    dir: P,
    prefix: &str,
    format: ExportFormat,
    at: DateTime<Local>,
) -> Result<Vec<PathBuf>, ExportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let stamp = at.format("%Y%m%dT%H%M%S");
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let name = format!(
            "{prefix}-{}-{stamp}.{}",
            artifact.kind(),
            format.extension()
        );
        let path = dir.join(name);
        export_artifact(artifact, &path, format)?;
        info!(path = %path.display(), "exported plot");
        written.push(path);
    }
    Ok(written)
}

fn export_delimited(artifact: &PlotArtifact, path: &Path, delimiter: u8) -> Result<(), ExportError> {
    let delimited = |source| ExportError::Delimited {
        path: path.to_path_buf(),
        source,
    };
    let mut w = WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(delimited)?;

    match artifact {
        PlotArtifact::ConfusionMatrix(cm) => {
            let names = cm.class_names.as_slice();
            w.write_record(["true\\predicted", names[0].as_str(), names[1].as_str()])
                .map_err(delimited)?;
            for (name, row) in names.iter().zip(cm.matrix.iter()) {
                w.write_record([name.clone(), row[0].to_string(), row[1].to_string()])
                    .map_err(delimited)?;
            }
        }
        PlotArtifact::RocCurve(roc) => {
            w.write_record(["threshold", "fpr", "tpr"]).map_err(delimited)?;
            for p in &roc.points {
                w.write_record([threshold_cell(p.threshold), p.fpr.to_string(), p.tpr.to_string()])
                    .map_err(delimited)?;
            }
        }
        PlotArtifact::PrecisionRecallCurve(pr) => {
            w.write_record(["threshold", "precision", "recall"])
                .map_err(delimited)?;
            for p in &pr.points {
                w.write_record([
                    threshold_cell(p.threshold),
                    p.precision.to_string(),
                    p.recall.to_string(),
                ])
                .map_err(delimited)?;
            }
        }
    }
    w.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// The origin point's threshold lies above every score.
fn threshold_cell(threshold: Option<f64>) -> String {
    threshold.map_or_else(|| "inf".to_owned(), |t| t.to_string())
}

fn export_json(artifact: &PlotArtifact, path: &Path) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, artifact).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)
}
