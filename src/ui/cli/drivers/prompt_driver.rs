use anyhow::Result;
use std::fmt::Display;

/// Accepted interval for a numeric answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub exclusive_min: bool,
    pub exclusive_max: bool,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            exclusive_min: false,
            exclusive_max: false,
        }
    }
}

impl<T: PartialOrd + Display + Copy> Bounds<T> {
    pub fn inclusive(min: Option<T>, max: Option<T>) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    /// `Err` carries the message shown next to the rejected answer.
    pub fn check(&self, x: T) -> Result<(), String> {
        let above_min = match self.min {
            Some(lo) if self.exclusive_min => x > lo,
            Some(lo) => x >= lo,
            None => true,
        };
        let below_max = match self.max {
            Some(hi) if self.exclusive_max => x < hi,
            Some(hi) => x <= hi,
            None => true,
        };
        if above_min && below_max {
            return Ok(());
        }

        let lo = self.min.map(|lo| {
            let op = if self.exclusive_min { ">" } else { "≥" };
            format!("{op} {lo}")
        });
        let hi = self.max.map(|hi| {
            let op = if self.exclusive_max { "<" } else { "≤" };
            format!("{op} {hi}")
        });
        Err(match (lo, hi) {
            (Some(lo), Some(hi)) => format!("Must be {lo} and {hi}"),
            (Some(bound), None) | (None, Some(bound)) => format!("Must be {bound}"),
            (None, None) => String::from("Invalid value"),
        })
    }
}

pub trait PromptDriver {
    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool>;
    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String>;
    fn ask_u64(&self, title: &str, help: &str, default: u64, bounds: Bounds<u64>) -> Result<u64>;
    fn ask_f64(&self, title: &str, help: &str, default: f64, bounds: Bounds<f64>) -> Result<f64>;

    /// Index of the picked option.
    fn ask_select(&self, title: &str, help: &str, options: &[String], default: usize)
    -> Result<usize>;

    /// Indices of the picked options, ascending.
    fn ask_multi_select(
        &self,
        title: &str,
        help: &str,
        options: &[String],
        defaults: &[usize],
    ) -> Result<Vec<usize>>;
}
