use anyhow::{Context, Result};
use chrono::Local;
use clap::ValueEnum;
use std::path::PathBuf;
use tracing::info;

use crate::core::dataset::SplitConfig;
use crate::evaluation::plots::{ExportFormat, export_all};
use crate::tasks::{EvaluationReport, Session};
use crate::ui::cli::drivers::{Bounds, PromptDriver};
use crate::ui::cli::wizard::{prompt_data_path, prompt_request};
use crate::ui::types::choices::ClassificationRequest;

const PREVIEW_ROWS: usize = 10;

/// Where and how plot artifacts are written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub dir: PathBuf,
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextStep {
    ClassifyAgain,
    SwitchDataset,
    ChangeSplit,
    Quit,
}

impl NextStep {
    const ALL: [NextStep; 4] = [
        NextStep::ClassifyAgain,
        NextStep::SwitchDataset,
        NextStep::ChangeSplit,
        NextStep::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            NextStep::ClassifyAgain => "Classify again",
            NextStep::SwitchDataset => "Load another dataset",
            NextStep::ChangeSplit => "Change the train/test split",
            NextStep::Quit => "Quit",
        }
    }
}

/// Runs one request, prints the report and, with `export`, writes its plots.
pub fn run_request(
    session: &Session,
    request: &ClassificationRequest,
    export: Option<&ExportOptions>,
) -> Result<EvaluationReport> {
    let report = session
        .classify(request)
        .context("classification request failed")?;
    println!("{report}");
    if let Some(options) = export {
        write_plots(request, &report, options)?;
    }
    Ok(report)
}

/// Interactive loop: request, results, then what next, until the user quits.
///
/// Request failures are printed and the loop goes on; only prompt failures
/// (e.g. the terminal closing) end it with an error.
pub fn run_wizard<D: PromptDriver>(
    session: &mut Session,
    driver: &D,
    export: Option<&ExportOptions>,
) -> Result<()> {
    loop {
        let request = prompt_request(driver)?;

        if driver.ask_bool(
            "Show raw data?",
            "Print the first encoded rows of the dataset",
            false,
        )? {
            println!("{}\n", session.dataset().preview(PREVIEW_ROWS));
        }

        match session.classify(&request) {
            Ok(report) => {
                println!("\n{report}\n");
                if !report.plots.is_empty() {
                    offer_export(driver, &request, &report, export)?;
                }
            }
            Err(e) => eprintln!("✗ {e}"),
        }

        match ask_next_step(driver)? {
            NextStep::ClassifyAgain => {}
            NextStep::SwitchDataset => {
                let current = session.data_path().to_string_lossy().into_owned();
                let path = prompt_data_path(driver, &current)?;
                if let Err(e) = session.ensure_dataset(&path) {
                    eprintln!("✗ {e}");
                }
            }
            NextStep::ChangeSplit => {
                let config = ask_split_config(driver, session.split_config())?;
                if let Err(e) = session.set_split_config(config) {
                    eprintln!("✗ {e}");
                }
            }
            NextStep::Quit => return Ok(()),
        }
    }
}

fn ask_next_step<D: PromptDriver>(driver: &D) -> Result<NextStep> {
    let labels: Vec<String> = NextStep::ALL.iter().map(|s| s.label().to_string()).collect();
    let picked = driver.ask_select("What next?", "", &labels, 0)?;
    NextStep::ALL
        .get(picked)
        .copied()
        .with_context(|| format!("no step at index {picked}"))
}

fn ask_split_config<D: PromptDriver>(driver: &D, current: SplitConfig) -> Result<SplitConfig> {
    let test_fraction = driver.ask_f64(
        "Test fraction",
        "Share of rows held out for scoring",
        current.test_fraction,
        Bounds {
            min: Some(0.0),
            max: Some(1.0),
            exclusive_min: true,
            exclusive_max: true,
        },
    )?;
    let seed = driver.ask_u64(
        "Split seed",
        "Same seed, same partition",
        current.seed,
        Bounds::default(),
    )?;
    Ok(SplitConfig {
        test_fraction,
        seed,
    })
}

fn offer_export<D: PromptDriver>(
    driver: &D,
    request: &ClassificationRequest,
    report: &EvaluationReport,
    configured: Option<&ExportOptions>,
) -> Result<()> {
    let options = match configured {
        Some(options) => options.clone(),
        None => {
            if !driver.ask_bool("Export plots to files?", "", false)? {
                return Ok(());
            }
            let dir = driver.ask_string("Export directory:", "Created if missing", "plots")?;
            let formats = ExportFormat::value_variants();
            let labels: Vec<String> = formats.iter().map(|f| f.extension().to_string()).collect();
            let picked = driver.ask_select("File format:", "", &labels, 0)?;
            ExportOptions {
                dir: PathBuf::from(dir.trim()),
                format: formats.get(picked).copied().unwrap_or_default(),
            }
        }
    };
    if let Err(e) = write_plots(request, report, &options) {
        eprintln!("✗ {e:#}");
    }
    Ok(())
}

fn write_plots(
    request: &ClassificationRequest,
    report: &EvaluationReport,
    options: &ExportOptions,
) -> Result<()> {
    if report.plots.is_empty() {
        return Ok(());
    }
    let prefix: &'static str = request.classifier.kind().into();
    let written = export_all(
        &report.plots,
        &options.dir,
        prefix,
        options.format,
        Local::now(),
    )
    .with_context(|| format!("exporting plots to {}", options.dir.display()))?;
    info!(files = written.len(), dir = %options.dir.display(), "plots exported");
    for path in written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::{mushroom_like_csv, write_csv};
    use crate::testing::stubs::{Answer, ScriptedDriver};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn request_mode_exports_every_plot() {
        let file = write_csv(&mushroom_like_csv(150, 31));
        let session = Session::open(file.path()).unwrap();
        let request = ClassificationRequest::from_json_str(
            r#"{"classifier": {"type": "knn", "params": {}},
                "plots": ["Confusion Matrix", "ROC Curve"]}"#,
        )
        .unwrap();
        let dir = tempdir().unwrap();
        let options = ExportOptions {
            dir: dir.path().join("out"),
            format: ExportFormat::Json,
        };

        let report = run_request(&session, &request, Some(&options)).unwrap();
        assert_eq!(report.plots.len(), 2);

        let mut names: Vec<String> = fs::read_dir(&options.dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names.len(), 2);
        assert!(names[0].starts_with("knn-confusion-matrix-") && names[0].ends_with(".json"));
        assert!(names[1].starts_with("knn-roc-curve-"));
    }

    #[test]
    fn request_mode_surfaces_configuration_errors() {
        let file = write_csv(&mushroom_like_csv(80, 32));
        let session = Session::open(file.path()).unwrap();
        let request = ClassificationRequest::from_json_str(
            r#"{"classifier": {"type": "svm", "params": {"C": -1}}}"#,
        )
        .unwrap();
        let err = run_request(&session, &request, None).unwrap_err();
        assert!(format!("{err:#}").contains("C = -1"), "{err:#}");
    }

    #[test]
    fn wizard_runs_one_request_and_quits() {
        let file = write_csv(&mushroom_like_csv(120, 33));
        let mut session = Session::open(file.path()).unwrap();
        let driver = ScriptedDriver::new([
            // KNN with defaults
            Answer::Select(3),
            Answer::Default,
            Answer::Default,
            Answer::Default,
            Answer::Default,
            Answer::MultiSelect(vec![0]),
            Answer::Bool(true),
            // decline export
            Answer::Bool(false),
            Answer::Select(3),
        ]);
        run_wizard(&mut session, &driver, None).unwrap();
        assert_eq!(driver.remaining(), 0);
        assert_eq!(driver.asked().last().map(String::as_str), Some("What next?"));
    }

    #[test]
    fn wizard_changes_split_then_switches_dataset() {
        let first = write_csv(&mushroom_like_csv(100, 34));
        let second = write_csv(&mushroom_like_csv(140, 35));
        let mut session = Session::open(first.path()).unwrap();
        let logistic = [
            Answer::Select(1),
            Answer::Default,
            Answer::Default,
            Answer::Default,
            Answer::Bool(false),
        ];

        let mut script: Vec<Answer> = logistic.to_vec();
        script.extend([
            Answer::Select(2),
            Answer::F64(0.5),
            Answer::U64(7),
        ]);
        script.extend(logistic.clone());
        script.extend([
            Answer::Select(1),
            Answer::Text(second.path().to_string_lossy().into_owned()),
        ]);
        script.extend(logistic);
        script.push(Answer::Select(3));

        let driver = ScriptedDriver::new(script);
        run_wizard(&mut session, &driver, None).unwrap();

        assert_eq!(driver.remaining(), 0);
        assert_eq!(
            session.split_config(),
            SplitConfig {
                test_fraction: 0.5,
                seed: 7
            }
        );
        assert_eq!(session.table().n_rows(), 140);
        assert_eq!(session.split().n_test(), 70);
    }

    #[test]
    fn configured_export_skips_the_prompt() {
        let file = write_csv(&mushroom_like_csv(100, 36));
        let mut session = Session::open(file.path()).unwrap();
        let dir = tempdir().unwrap();
        let options = ExportOptions {
            dir: dir.path().to_path_buf(),
            format: ExportFormat::Csv,
        };
        let driver = ScriptedDriver::new([
            Answer::Select(2),
            Answer::Default,
            Answer::U64(3),
            Answer::Default,
            Answer::MultiSelect(vec![2]),
            Answer::Bool(false),
            Answer::Select(3),
        ]);
        run_wizard(&mut session, &driver, Some(&options)).unwrap();
        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        assert!(
            !driver
                .asked()
                .iter()
                .any(|t| t == "Export plots to files?")
        );
    }
}
