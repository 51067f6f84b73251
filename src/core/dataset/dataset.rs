use crate::core::attributes::NominalAttribute;
use crate::core::dataset::LabeledTable;
use crate::error::DataFormatError;
use ndarray::{Array1, Array2};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// One label-encoded column: its fitted vocabulary and the code of every row.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedColumn {
    pub attribute: NominalAttribute,
    pub codes: Vec<usize>,
}

impl EncodedColumn {
    /// Encodes `values` with `attribute`, failing on the first value outside
    /// its vocabulary. Rows are numbered from 1.
    pub fn encode<'a, I>(attribute: NominalAttribute, values: I) -> Result<Self, DataFormatError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let codes = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                attribute
                    .encode(value)
                    .ok_or_else(|| DataFormatError::UnknownValue {
                        column: attribute.name.clone(),
                        row: i + 1,
                        value: value.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { attribute, codes })
    }

    pub fn name(&self) -> &str {
        &self.attribute.name
    }

    pub fn raw_value(&self, row: usize) -> Option<&str> {
        self.codes
            .get(row)
            .and_then(|&code| self.attribute.decode(code))
    }
}

/// Immutable, fully encoded categorical table.
///
/// Every column is encoded by its own [`NominalAttribute`]; the same code can
/// mean different things in different columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    relation_name: String,
    columns: Vec<EncodedColumn>,
    n_rows: usize,
}

impl Dataset {
    /// Builds and encodes a table from a header and raw string records.
    ///
    /// Rows are numbered from 1 in errors, matching the data lines after the
    /// header.
    pub fn from_records<S: AsRef<str>>(
        relation_name: impl Into<String>,
        headers: Vec<String>,
        records: Vec<Vec<S>>,
    ) -> Result<Self, DataFormatError> {
        if records.is_empty() {
            return Err(DataFormatError::Empty);
        }

        let mut seen = HashSet::new();
        for h in &headers {
            if !seen.insert(h.as_str()) {
                return Err(DataFormatError::DuplicateColumn(h.clone()));
            }
        }

        let width = headers.len();
        for (i, record) in records.iter().enumerate() {
            if record.len() != width {
                return Err(DataFormatError::RaggedRecord {
                    row: i + 1,
                    expected: width,
                    found: record.len(),
                });
            }
            if let Some(j) = record.iter().position(|v| v.as_ref().trim().is_empty()) {
                return Err(DataFormatError::MissingValue {
                    column: headers[j].clone(),
                    row: i + 1,
                });
            }
        }

        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(j, name)| {
                let values = || records.iter().map(move |r| r[j].as_ref().trim());
                EncodedColumn::encode(NominalAttribute::fit(name, values()), values())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            relation_name: relation_name.into(),
            columns,
            n_rows: records.len(),
        })
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[EncodedColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&EncodedColumn> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(EncodedColumn::name)
    }

    /// Splits the table into a feature matrix and the binary target column.
    pub fn labeled(&self, target: &str) -> Result<LabeledTable, DataFormatError> {
        let target_column = self
            .column(target)
            .ok_or_else(|| DataFormatError::MissingTarget(target.to_string()))?;

        if target_column.attribute.len() != 2 {
            return Err(DataFormatError::NotBinary {
                column: target.to_string(),
                found: target_column.attribute.len(),
            });
        }

        let feature_columns: Vec<&EncodedColumn> =
            self.columns.iter().filter(|c| c.name() != target).collect();

        let features = Array2::from_shape_fn((self.n_rows, feature_columns.len()), |(i, j)| {
            feature_columns[j].codes[i] as f64
        });
        let targets = Array1::from_vec(target_column.codes.clone());

        Ok(LabeledTable::new(
            features,
            targets,
            feature_columns
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
            target_column.attribute.clone(),
        ))
    }

    /// Text view of the first `rows` rows, raw values next to their codes.
    pub fn preview(&self, rows: usize) -> DatasetPreview<'_> {
        DatasetPreview {
            dataset: self,
            rows: rows.min(self.n_rows),
        }
    }
}

pub struct DatasetPreview<'a> {
    dataset: &'a Dataset,
    rows: usize,
}

impl Display for DatasetPreview<'_> {
    /// Cells read `raw:code`, e.g. `p:1`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let columns = &self.dataset.columns;
        let cells: Vec<Vec<String>> = (0..self.rows)
            .map(|row| {
                columns
                    .iter()
                    .map(|c| format!("{}:{}", c.raw_value(row).unwrap_or("?"), c.codes[row]))
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(j, c)| {
                cells
                    .iter()
                    .map(|r| r[j].chars().count())
                    .fold(c.name().len(), usize::max)
            })
            .collect();

        write!(f, "{:>6}", "")?;
        for (c, w) in columns.iter().zip(&widths) {
            write!(f, " {:>w$}", c.name(), w = w)?;
        }
        writeln!(f)?;

        for (row, values) in cells.iter().enumerate() {
            write!(f, "{:>6}", row)?;
            for (cell, w) in values.iter().zip(&widths) {
                write!(f, " {:>w$}", cell, w = w)?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "[{} rows x {} columns]",
            self.dataset.n_rows,
            self.dataset.n_columns()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_a_value_outside_the_vocabulary_is_an_error() {
        let attribute = NominalAttribute::fit("odor".into(), ["a", "f"]);
        let err = EncodedColumn::encode(attribute.clone(), ["f", "a", "n"]).unwrap_err();
        assert!(matches!(
            err,
            DataFormatError::UnknownValue { ref column, row: 3, ref value }
                if column == "odor" && value == "n"
        ));

        let column = EncodedColumn::encode(attribute, ["f", "a"]).unwrap();
        assert_eq!(column.codes, vec![1, 0]);
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn small() -> Dataset {
        Dataset::from_records(
            "small",
            headers(&["type", "odor", "ring"]),
            vec![
                vec!["p", "f", "e"],
                vec!["e", "a", "p"],
                vec!["e", "n", "p"],
                vec!["p", "f", "?"],
            ],
        )
        .unwrap()
    }

    #[test]
    fn encodes_every_column_independently() {
        let ds = small();
        assert_eq!(ds.n_rows(), 4);
        assert_eq!(ds.n_columns(), 3);

        let ty = ds.column("type").unwrap();
        assert_eq!(ty.attribute.values, vec!["e", "p"]);
        assert_eq!(ty.codes, vec![1, 0, 0, 1]);

        let odor = ds.column("odor").unwrap();
        assert_eq!(odor.attribute.values, vec!["a", "f", "n"]);
        assert_eq!(odor.codes, vec![1, 0, 2, 1]);

        let ring = ds.column("ring").unwrap();
        assert_eq!(ring.attribute.values, vec!["?", "e", "p"]);
        assert_eq!(ring.raw_value(3), Some("?"));
    }

    #[test]
    fn labeled_drops_target_from_features() {
        let table = small().labeled("type").unwrap();
        assert_eq!(table.feature_names, vec!["odor", "ring"]);
        assert_eq!(table.features.nrows(), table.target.len());
        assert_eq!(table.features.ncols(), 2);
        assert_eq!(table.features[[2, 0]], 2.0);
        assert_eq!(table.target.to_vec(), vec![1, 0, 0, 1]);
    }

    #[test]
    fn missing_target_is_rejected() {
        let err = small().labeled("class").unwrap_err();
        assert!(matches!(err, DataFormatError::MissingTarget(c) if c == "class"));
    }

    #[test]
    fn non_binary_target_is_rejected() {
        let err = small().labeled("odor").unwrap_err();
        assert!(matches!(err, DataFormatError::NotBinary { found: 3, .. }));
    }

    #[test]
    fn empty_field_is_a_missing_value() {
        let err = Dataset::from_records(
            "x",
            headers(&["type", "odor"]),
            vec![vec!["p", "f"], vec!["e", " "]],
        )
        .unwrap_err();
        assert!(matches!(err, DataFormatError::MissingValue { row: 2, ref column } if column == "odor"));
    }

    #[test]
    fn ragged_and_empty_inputs_are_rejected() {
        let err = Dataset::from_records(
            "x",
            headers(&["type", "odor"]),
            vec![vec!["p", "f"], vec!["e"]],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DataFormatError::RaggedRecord {
                row: 2,
                expected: 2,
                found: 1
            }
        ));

        let err =
            Dataset::from_records("x", headers(&["type"]), Vec::<Vec<&str>>::new()).unwrap_err();
        assert!(matches!(err, DataFormatError::Empty));
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let err = Dataset::from_records("x", headers(&["a", "a"]), vec![vec!["1", "2"]])
            .unwrap_err();
        assert!(matches!(err, DataFormatError::DuplicateColumn(c) if c == "a"));
    }

    #[test]
    fn preview_lists_requested_rows() {
        let ds = small();
        let text = ds.preview(2).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("type") && lines[0].contains("odor"));
        assert!(lines[1].contains("p:1") && lines[1].contains("f:1"));
        assert!(lines[2].ends_with("p:2"));
        assert_eq!(lines[3], "[4 rows x 3 columns]");

        let all = ds.preview(100).to_string();
        assert_eq!(all.lines().count(), 6);
    }
}
