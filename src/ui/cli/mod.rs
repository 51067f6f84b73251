pub mod app;
pub mod drivers;
pub mod wizard;
