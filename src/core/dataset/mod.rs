mod dataset;
mod labeled_table;
mod loader;
mod split;

pub use dataset::{Dataset, DatasetPreview, EncodedColumn};
pub use labeled_table::{ClassNames, LabeledTable, TARGET_COLUMN};
pub use loader::load;
pub use split::{
    DEFAULT_SPLIT_SEED, DEFAULT_TEST_FRACTION, Split, SplitConfig, split, split_with, test_size,
};
