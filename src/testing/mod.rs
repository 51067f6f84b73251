//! Fixtures shared by unit tests and, behind the `test-support` feature, by
//! downstream crates.

pub mod dummies;
pub mod stubs;
