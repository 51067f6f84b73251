use crate::core::attributes::NominalAttribute;
use crate::core::dataset::{Dataset, LabeledTable, TARGET_COLUMN};
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADERS: [&str; 5] = ["type", "cap-shape", "odor", "gill-size", "ring-type"];
const ODORS: [&str; 6] = ["a", "l", "n", "p", "s", "y"];
const CAP_SHAPES: [&str; 6] = ["b", "c", "f", "k", "s", "x"];
const RING_TYPES: [&str; 5] = ["e", "f", "l", "n", "p"];

/// Mushroom-shaped records: `type` is poisonous exactly when `odor` is one of
/// `p`, `s`, `y`, `gill-size` agrees with `type` nine times out of ten and the
/// remaining columns are noise. Rows 0 and 1 are always edible and
/// poisonous respectively.
pub fn mushroom_like_records(rows: usize, seed: u64) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let records = (0..rows)
        .map(|i| {
            let odor = match i {
                0 => "n",
                1 => "p",
                _ => ODORS[rng.random_range(0..ODORS.len())],
            };
            let poisonous = matches!(odor, "p" | "s" | "y");
            let narrow_gills = poisonous == rng.random_bool(0.9);
            vec![
                if poisonous { "p" } else { "e" }.to_string(),
                CAP_SHAPES[rng.random_range(0..CAP_SHAPES.len())].to_string(),
                odor.to_string(),
                if narrow_gills { "n" } else { "b" }.to_string(),
                RING_TYPES[rng.random_range(0..RING_TYPES.len())].to_string(),
            ]
        })
        .collect();
    (HEADERS.iter().map(|h| h.to_string()).collect(), records)
}

/// [`mushroom_like_records`] as CSV text with a header line.
pub fn mushroom_like_csv(rows: usize, seed: u64) -> String {
    let (headers, records) = mushroom_like_records(rows, seed);
    let mut out = headers.join(",");
    out.push('\n');
    for record in records {
        out.push_str(&record.join(","));
        out.push('\n');
    }
    out
}

/// Encoded [`mushroom_like_records`], learnable by every registered classifier.
pub fn labeled_table(rows: usize, seed: u64) -> LabeledTable {
    let (headers, records) = mushroom_like_records(rows.max(2), seed);
    Dataset::from_records("mushrooms", headers, records)
        .and_then(|ds| ds.labeled(TARGET_COLUMN))
        .expect("generated records always encode")
}

/// Row `i` has features `[i, 2i]` and label `i % 2`.
pub fn sequential_table(rows: usize) -> LabeledTable {
    let features = Array2::from_shape_fn((rows, 2), |(i, j)| (i * (j + 1)) as f64);
    let target = Array1::from_shape_fn(rows, |i| i % 2);
    LabeledTable::new(
        features,
        target,
        vec!["index".into(), "double".into()],
        NominalAttribute::fit(TARGET_COLUMN.into(), ["e", "p"]),
    )
}

/// Writes `contents` to a fresh `.csv` temp file, removed on drop.
pub fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp csv");
    file.write_all(contents.as_bytes()).expect("write temp csv");
    file.flush().expect("flush temp csv");
    file
}
