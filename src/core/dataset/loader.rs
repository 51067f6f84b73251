use crate::core::dataset::Dataset;
use crate::error::DataFormatError;
use csv::{ReaderBuilder, Trim};
use std::path::Path;
use tracing::{debug, info};

/// Reads a header-first CSV of categorical columns and label-encodes it.
///
/// Every column gets its own encoder. `?` and any other non-empty token are
/// ordinary categories; empty fields are missing values and rejected.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, DataFormatError> {
    let path = path.as_ref();
    let unreadable = |source| DataFormatError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(unreadable)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(unreadable)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result.map_err(|source| DataFormatError::MalformedRecord { row: i + 1, source })?;
        records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    debug!(rows = records.len(), columns = headers.len(), "parsed csv");

    let relation = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string();
    let dataset = Dataset::from_records(relation, headers, records)?;

    info!(
        path = %path.display(),
        rows = dataset.n_rows(),
        columns = dataset.n_columns(),
        "dataset loaded"
    );
    Ok(dataset)
}
