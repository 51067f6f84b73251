mod wizard;

pub use wizard::{prompt_choice, prompt_data_path, prompt_plots, prompt_request};
