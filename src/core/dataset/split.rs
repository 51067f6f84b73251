use crate::core::dataset::LabeledTable;
use crate::error::ConfigurationError;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEST_FRACTION: f64 = 0.3;
pub const DEFAULT_SPLIT_SEED: u64 = 0;

/// Parameters of the holdout partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SPLIT_SEED,
        }
    }
}

/// Train/test partition of a [`LabeledTable`].
///
/// `train_indices` and `test_indices` refer to rows of the source table and
/// list the rows in the order they appear in the partition matrices.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train_features: Array2<f64>,
    pub test_features: Array2<f64>,
    pub train_target: Array1<usize>,
    pub test_target: Array1<usize>,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

impl Split {
    pub fn train(&self) -> (ArrayView2<'_, f64>, ArrayView1<'_, usize>) {
        (self.train_features.view(), self.train_target.view())
    }

    pub fn test(&self) -> (ArrayView2<'_, f64>, ArrayView1<'_, usize>) {
        (self.test_features.view(), self.test_target.view())
    }

    pub fn n_train(&self) -> usize {
        self.train_indices.len()
    }

    pub fn n_test(&self) -> usize {
        self.test_indices.len()
    }
}

/// Number of test rows for a table of `rows` rows: `ceil(fraction * rows)`.
pub fn test_size(rows: usize, test_fraction: f64) -> usize {
    (test_fraction * rows as f64).ceil() as usize
}

/// Shuffles row indices with a seeded RNG and cuts them into test and train
/// partitions. Identical table, fraction and seed give an identical split.
pub fn split(
    table: &LabeledTable,
    test_fraction: f64,
    seed: u64,
) -> Result<Split, ConfigurationError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ConfigurationError::InvalidTestFraction(test_fraction));
    }

    let rows = table.n_rows();
    let n_test = test_size(rows, test_fraction);
    if n_test == 0 || n_test >= rows {
        return Err(ConfigurationError::EmptyPartition {
            rows,
            test_fraction,
        });
    }

    let mut permutation: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let train_indices = permutation.split_off(n_test);
    let test_indices = permutation;

    Ok(Split {
        train_features: table.features.select(Axis(0), &train_indices),
        test_features: table.features.select(Axis(0), &test_indices),
        train_target: table.target.select(Axis(0), &train_indices),
        test_target: table.target.select(Axis(0), &test_indices),
        train_indices,
        test_indices,
    })
}

/// [`split`] with a [`SplitConfig`].
pub fn split_with(table: &LabeledTable, config: SplitConfig) -> Result<Split, ConfigurationError> {
    split(table, config.test_fraction, config.seed)
}
