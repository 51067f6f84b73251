mod classifiers;

pub use classifiers::build_classifier;
