use crate::ui::cli::drivers::{Bounds, PromptDriver};
use anyhow::Result;
use inquire::{Confirm, CustomType, MultiSelect, Select, Text, validator::Validation};

/// Terminal prompts backed by `inquire`.
pub struct InquireDriver;

impl PromptDriver for InquireDriver {
    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new(title)
            .with_default(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String> {
        Ok(Text::new(title)
            .with_initial_value(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_u64(&self, title: &str, help: &str, default: u64, bounds: Bounds<u64>) -> Result<u64> {
        Ok(CustomType::<u64>::new(title)
            .with_default(default)
            .with_help_message(help)
            .with_validator(move |x: &u64| {
                Ok(match bounds.check(*x) {
                    Ok(()) => Validation::Valid,
                    Err(msg) => Validation::Invalid(msg.into()),
                })
            })
            .prompt()?)
    }

    fn ask_f64(&self, title: &str, help: &str, default: f64, bounds: Bounds<f64>) -> Result<f64> {
        Ok(CustomType::<f64>::new(title)
            .with_default(default)
            .with_help_message(help)
            .with_validator(move |x: &f64| {
                Ok(match bounds.check(*x) {
                    Ok(()) => Validation::Valid,
                    Err(msg) => Validation::Invalid(msg.into()),
                })
            })
            .prompt()?)
    }

    fn ask_select(
        &self,
        title: &str,
        help: &str,
        options: &[String],
        default: usize,
    ) -> Result<usize> {
        let picked = Select::new(title, options.to_vec())
            .with_starting_cursor(default)
            .with_help_message(help)
            .raw_prompt()?;
        Ok(picked.index)
    }

    fn ask_multi_select(
        &self,
        title: &str,
        help: &str,
        options: &[String],
        defaults: &[usize],
    ) -> Result<Vec<usize>> {
        let picked = MultiSelect::new(title, options.to_vec())
            .with_default(defaults)
            .with_help_message(help)
            .raw_prompt()?;
        Ok(picked.into_iter().map(|o| o.index).collect())
    }
}
