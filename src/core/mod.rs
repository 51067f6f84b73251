pub mod attributes;
pub mod dataset;
