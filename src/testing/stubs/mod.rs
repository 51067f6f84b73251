pub mod scripted_classifier;
pub mod scripted_driver;

pub use scripted_classifier::ScriptedClassifier;
pub use scripted_driver::{Answer, ScriptedDriver};
