use crate::ui::cli::drivers::{Bounds, PromptDriver};
use anyhow::{Result, bail};
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Accept whatever default the prompt offers.
    Default,
    Bool(bool),
    Text(String),
    U64(u64),
    F64(f64),
    Select(usize),
    MultiSelect(Vec<usize>),
}

/// Replays queued answers and records every prompt title it was asked.
///
/// Numeric answers are checked against the prompt's bounds and an
/// out-of-range one is an error, like a rejected terminal entry.
#[derive(Default)]
pub struct ScriptedDriver {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedDriver {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, title: &str) -> Result<Answer> {
        self.asked.borrow_mut().push(title.to_string());
        match self.answers.borrow_mut().pop_front() {
            Some(a) => Ok(a),
            None => bail!("no scripted answer left for '{title}'"),
        }
    }
}

impl PromptDriver for ScriptedDriver {
    fn ask_bool(&self, title: &str, _help: &str, default: bool) -> Result<bool> {
        match self.next(title)? {
            Answer::Default => Ok(default),
            Answer::Bool(b) => Ok(b),
            other => bail!("'{title}' expects a bool, script has {other:?}"),
        }
    }

    fn ask_string(&self, title: &str, _help: &str, default: &str) -> Result<String> {
        match self.next(title)? {
            Answer::Default => Ok(default.to_string()),
            Answer::Text(s) => Ok(s),
            other => bail!("'{title}' expects text, script has {other:?}"),
        }
    }

    fn ask_u64(&self, title: &str, _help: &str, default: u64, bounds: Bounds<u64>) -> Result<u64> {
        let value = match self.next(title)? {
            Answer::Default => default,
            Answer::U64(n) => n,
            other => bail!("'{title}' expects an integer, script has {other:?}"),
        };
        bounds.check(value).map_err(anyhow::Error::msg)?;
        Ok(value)
    }

    fn ask_f64(&self, title: &str, _help: &str, default: f64, bounds: Bounds<f64>) -> Result<f64> {
        let value = match self.next(title)? {
            Answer::Default => default,
            Answer::F64(x) => x,
            other => bail!("'{title}' expects a number, script has {other:?}"),
        };
        bounds.check(value).map_err(anyhow::Error::msg)?;
        Ok(value)
    }

    fn ask_select(
        &self,
        title: &str,
        _help: &str,
        options: &[String],
        default: usize,
    ) -> Result<usize> {
        let index = match self.next(title)? {
            Answer::Default => default,
            Answer::Select(i) => i,
            other => bail!("'{title}' expects a selection, script has {other:?}"),
        };
        if index >= options.len() {
            bail!("'{title}' has {} options, script picked {index}", options.len());
        }
        Ok(index)
    }

    fn ask_multi_select(
        &self,
        title: &str,
        _help: &str,
        options: &[String],
        defaults: &[usize],
    ) -> Result<Vec<usize>> {
        let picked = match self.next(title)? {
            Answer::Default => defaults.to_vec(),
            Answer::MultiSelect(v) => v,
            other => bail!("'{title}' expects selections, script has {other:?}"),
        };
        if let Some(bad) = picked.iter().find(|&&i| i >= options.len()) {
            bail!("'{title}' has {} options, script picked {bad}", options.len());
        }
        Ok(picked)
    }
}
