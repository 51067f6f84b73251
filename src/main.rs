//! amanita: train and compare binary classifiers on a categorical dataset.

use amanita::core::dataset::{DEFAULT_SPLIT_SEED, DEFAULT_TEST_FRACTION, SplitConfig};
use amanita::evaluation::plots::ExportFormat;
use amanita::tasks::{PipelineStage, Progress, Session};
use amanita::ui::cli::app::{ExportOptions, run_request, run_wizard};
use amanita::ui::cli::drivers::InquireDriver;
use amanita::ui::cli::wizard::prompt_data_path;
use amanita::ui::types::choices::ClassificationRequest;
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_PATH: &str = "mushrooms.csv";

#[derive(Parser)]
#[command(name = "amanita")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train SVM, logistic regression, random forest or k-NN on the mushroom data", long_about = None)]
struct Cli {
    /// CSV dataset with a binary `type` column (asked for interactively when omitted)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// JSON request to run once, without prompts
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Write requested plots into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// File format of exported plots
    #[arg(long, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Share of rows held out for testing
    #[arg(long, default_value_t = DEFAULT_TEST_FRACTION)]
    test_fraction: f64,

    /// Seed of the train/test shuffle
    #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
    seed: u64,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AMANITA_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("amanita=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let split = SplitConfig {
        test_fraction: cli.test_fraction,
        seed: cli.seed,
    };
    let export = cli.export_dir.map(|dir| ExportOptions {
        dir,
        format: cli.format,
    });

    if let Some(request_path) = cli.request {
        let text = fs::read_to_string(&request_path)
            .with_context(|| format!("reading request {}", request_path.display()))?;
        let request = ClassificationRequest::from_json_str(&text)
            .with_context(|| format!("parsing request {}", request_path.display()))?;
        let data = cli.data.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        let session = Session::open_with(&data, split)
            .with_context(|| format!("opening dataset {}", data.display()))?;
        run_request(&session, &request, export.as_ref())?;
        return Ok(());
    }

    let driver = InquireDriver;
    let data = match cli.data {
        Some(path) => path,
        None => prompt_data_path(&driver, DEFAULT_DATA_PATH)?,
    };

    let mut session = Session::open_with(&data, split)
        .with_context(|| format!("opening dataset {}", data.display()))?
        .with_progress(spawn_progress_printer());
    run_wizard(&mut session, &driver, export.as_ref())
}

fn progress_line(progress: &Progress) -> Option<String> {
    (progress.stage != PipelineStage::Idle).then(|| {
        format!(
            "  {} {}… ({:.1}s)",
            progress.classifier, progress.stage, progress.elapsed_seconds
        )
    })
}

/// Prints stage transitions to stderr from a background thread.
fn spawn_progress_printer() -> mpsc::Sender<Progress> {
    let (tx, rx) = mpsc::channel::<Progress>();
    thread::spawn(move || {
        for line in rx.iter().filter_map(|p| progress_line(&p)) {
            eprintln!("{line}");
        }
    });
    tx
}
