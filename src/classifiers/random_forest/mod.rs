mod random_forest;

pub use random_forest::{DEFAULT_FOREST_SEED, RandomForest, RandomForestModel};
