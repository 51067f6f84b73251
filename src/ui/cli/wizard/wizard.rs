use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use strum::{EnumMessage, IntoEnumIterator};

use crate::evaluation::plots::PlotKind;
use crate::ui::cli::drivers::{Bounds, PromptDriver};
use crate::ui::types::choices::{
    ClassificationRequest, ClassifierChoice, FieldKind, FieldSpec, UIChoice, schema_for,
    specs_for_kind,
};

const DIM_ITALIC: &str = "\x1b[2m\x1b[3m";
const RESET: &str = "\x1b[0m";

fn kind_labels<K>() -> Vec<(K, String)>
where
    K: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator,
{
    K::iter()
        .map(|k| {
            let label = k.get_message().unwrap_or_else(|| k.into());
            let desc = k.get_detailed_message().unwrap_or("");
            let text = if desc.is_empty() {
                label.to_string()
            } else {
                format!("{label}  {DIM_ITALIC}{desc}{RESET}")
            };
            (k, text)
        })
        .collect()
}

/// Asks for a variant of `C`, then for each of its schema fields.
pub fn prompt_choice<C: UIChoice, D: PromptDriver>(driver: &D) -> Result<C> {
    let (kinds, labels): (Vec<C::Kind>, Vec<String>) = kind_labels::<C::Kind>().into_iter().unzip();
    let help = C::prompt_help().unwrap_or("");
    let picked = driver.ask_select(C::prompt_label(), help, &labels, 0)?;
    let choice_kind = *kinds
        .get(picked)
        .with_context(|| format!("no choice at index {picked}"))?;

    let key: &'static str = choice_kind.into();
    let schema = schema_for::<C>();
    let specs = specs_for_kind(&schema, key)?;

    let defaults = C::default_params(choice_kind);

    let mut params = Map::new();
    for s in specs {
        let init = s.default.clone().or_else(|| defaults.get(&s.name).cloned());
        let val = prompt_field(driver, &s, init)?;
        params.insert(s.name.clone(), val);
    }

    C::from_parts(choice_kind, Value::Object(params))
}

fn prompt_field<D: PromptDriver>(driver: &D, s: &FieldSpec, init: Option<Value>) -> Result<Value> {
    let help = s.description.as_deref().unwrap_or("");
    Ok(match &s.kind {
        FieldKind::Boolean => {
            let def = init.and_then(|v| v.as_bool()).unwrap_or(false);
            Value::Bool(driver.ask_bool(&s.title, help, def)?)
        }
        FieldKind::String => {
            let def = init
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            Value::String(driver.ask_string(&s.title, help, &def)?)
        }
        FieldKind::Integer => {
            let def = init.and_then(|v| v.as_u64()).unwrap_or(0);
            let bounds = Bounds {
                min: s.min.map(|x| x as u64),
                max: s.max.map(|x| x as u64),
                exclusive_min: s.exclusive_min,
                exclusive_max: s.exclusive_max,
            };
            Value::from(driver.ask_u64(&s.title, help, def, bounds)?)
        }
        FieldKind::Number => {
            let def = init.and_then(|v| v.as_f64()).unwrap_or(0.0);
            let bounds = Bounds {
                min: s.min,
                max: s.max,
                exclusive_min: s.exclusive_min,
                exclusive_max: s.exclusive_max,
            };
            Value::from(driver.ask_f64(&s.title, help, def, bounds)?)
        }
        FieldKind::Choice(options) => {
            let def = init
                .as_ref()
                .and_then(|v| v.as_str())
                .and_then(|d| options.iter().position(|o| o == d))
                .unwrap_or(0);
            let picked = driver.ask_select(&s.title, help, options, def)?;
            let option = options
                .get(picked)
                .with_context(|| format!("no option at index {picked} for {}", s.title))?;
            Value::String(option.clone())
        }
    })
}

/// Multi-select over every [`PlotKind`]; nothing picked means no plots.
pub fn prompt_plots<D: PromptDriver>(driver: &D) -> Result<BTreeSet<PlotKind>> {
    let kinds: Vec<PlotKind> = PlotKind::iter().collect();
    let labels: Vec<String> = kinds
        .iter()
        .map(|&k| k.get_message().unwrap_or_else(|| k.into()).to_string())
        .collect();
    let picked = driver.ask_multi_select(
        "Choose the plots to draw:",
        "space to toggle, ↵ to confirm",
        &labels,
        &[],
    )?;
    Ok(picked.into_iter().filter_map(|i| kinds.get(i).copied()).collect())
}

/// Classifier, its hyperparameters and the plots, as one request.
pub fn prompt_request<D: PromptDriver>(driver: &D) -> Result<ClassificationRequest> {
    let classifier = prompt_choice::<ClassifierChoice, D>(driver)?;
    let plots = prompt_plots(driver)?;
    Ok(ClassificationRequest::new(classifier, plots))
}

/// Asks until the answer names an existing `.csv` file.
pub fn prompt_data_path<D: PromptDriver>(driver: &D, default: &str) -> Result<PathBuf> {
    prompt_path_until_ok(
        driver,
        "Dataset path:",
        "CSV file with a binary 'type' column",
        default,
        true,
        true,
        &["csv"],
    )
}

pub(crate) fn validate_path_str(
    input: &str,
    must_exist: bool,
    must_be_file: bool,
    allowed_exts: &[&str],
) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Path cannot be empty".into());
    }
    let p = Path::new(trimmed);

    if must_exist && !p.exists() {
        return Err(format!("Path does not exist: {}", p.display()));
    }
    if must_be_file && p.exists() && !p.is_file() {
        return Err("Expected a file path, not a directory".into());
    }
    if !allowed_exts.is_empty() {
        match p.extension().and_then(|e| e.to_str()) {
            Some(ext) if allowed_exts.iter().any(|e| e.eq_ignore_ascii_case(ext)) => {}
            _ => return Err(format!("Expected a .{} file", allowed_exts.join(" / ."))),
        }
    }
    Ok(())
}

pub(crate) fn prompt_path_until_ok<D: PromptDriver>(
    driver: &D,
    title: &str,
    help: &str,
    default: &str,
    must_exist: bool,
    must_be_file: bool,
    allowed_exts: &[&str],
) -> Result<PathBuf> {
    loop {
        let answer = driver.ask_string(title, help, default)?;
        match validate_path_str(&answer, must_exist, must_be_file, allowed_exts) {
            Ok(()) => return Ok(PathBuf::from(answer.trim())),
            Err(msg) => {
                eprintln!("✗ {}", msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::write_csv;
    use crate::testing::stubs::{Answer, ScriptedDriver};
    use crate::ui::types::choices::{
        KnnAlgorithm, KnnParameters, KnnWeights, RandomForestParameters, SvmGamma, SvmKernel,
        SvmParameters,
    };

    #[test]
    fn defaults_everywhere_give_default_svm() {
        let driver = ScriptedDriver::new([
            Answer::Select(0),
            Answer::Default,
            Answer::Default,
            Answer::Default,
        ]);
        let choice: ClassifierChoice = prompt_choice(&driver).unwrap();
        assert_eq!(choice, ClassifierChoice::Svm(SvmParameters::default()));
        assert_eq!(driver.remaining(), 0);
    }

    #[test]
    fn answers_flow_into_parameters() {
        let driver = ScriptedDriver::new([
            Answer::Select(3),
            Answer::U64(7),
            Answer::Select(2),
            Answer::Select(1),
            Answer::U64(40),
        ]);
        let choice: ClassifierChoice = prompt_choice(&driver).unwrap();
        assert_eq!(
            choice,
            ClassifierChoice::Knn(KnnParameters {
                n_neighbors: 7,
                algorithm: KnnAlgorithm::KdTree,
                weights: KnnWeights::Distance,
                leaf_size: 40
            })
        );
    }

    #[test]
    fn svm_choices_and_c() {
        let driver = ScriptedDriver::new([
            Answer::Select(0),
            Answer::F64(2.5),
            Answer::Select(1),
            Answer::Select(1),
        ]);
        let choice: ClassifierChoice = prompt_choice(&driver).unwrap();
        assert_eq!(
            choice,
            ClassifierChoice::Svm(SvmParameters {
                c: 2.5,
                kernel: SvmKernel::Linear,
                gamma: SvmGamma::Auto
            })
        );
    }

    #[test]
    fn schema_bounds_reach_the_driver() {
        let driver = ScriptedDriver::new([Answer::Select(0), Answer::F64(0.01)]);
        let err = prompt_choice::<ClassifierChoice, _>(&driver).unwrap_err();
        assert!(err.to_string().contains("> 0.01"), "{err}");

        let driver = ScriptedDriver::new([Answer::Select(2), Answer::U64(50)]);
        let err = prompt_choice::<ClassifierChoice, _>(&driver).unwrap_err();
        assert!(err.to_string().contains("≥ 100"), "{err}");
    }

    #[test]
    fn random_forest_with_bootstrap_off() {
        let driver = ScriptedDriver::new([
            Answer::Select(2),
            Answer::Default,
            Answer::U64(5),
            Answer::Bool(false),
        ]);
        let choice: ClassifierChoice = prompt_choice(&driver).unwrap();
        assert_eq!(
            choice,
            ClassifierChoice::RandomForest(RandomForestParameters {
                n_estimators: 100,
                max_depth: 5,
                bootstrap: false
            })
        );
        assert_eq!(
            driver.asked(),
            vec![
                "Choose a classifier:",
                "Number of trees",
                "Maximum depth",
                "Bootstrap samples"
            ]
        );
    }

    #[test]
    fn plots_are_picked_by_index() {
        let driver = ScriptedDriver::new([Answer::MultiSelect(vec![2, 0])]);
        let plots = prompt_plots(&driver).unwrap();
        assert_eq!(
            plots.into_iter().collect::<Vec<_>>(),
            vec![PlotKind::ConfusionMatrix, PlotKind::PrecisionRecallCurve]
        );

        let driver = ScriptedDriver::new([Answer::Default]);
        assert!(prompt_plots(&driver).unwrap().is_empty());
    }

    #[test]
    fn request_combines_classifier_and_plots() {
        let driver = ScriptedDriver::new([
            Answer::Select(1),
            Answer::Default,
            Answer::Default,
            Answer::MultiSelect(vec![1]),
        ]);
        let request = prompt_request(&driver).unwrap();
        assert_eq!(request.classifier.model_name(), "Logistic Regression");
        assert_eq!(
            request.plots.into_iter().collect::<Vec<_>>(),
            vec![PlotKind::RocCurve]
        );
    }

    #[test]
    fn data_path_is_asked_until_valid() {
        let file = write_csv("type,odor\np,f\ne,a\n");
        let path = file.path().to_string_lossy().into_owned();
        let driver = ScriptedDriver::new([
            Answer::Text("/no/such/file.csv".into()),
            Answer::Text(String::new()),
            Answer::Text(path.clone()),
        ]);
        let got = prompt_data_path(&driver, "mushrooms.csv").unwrap();
        assert_eq!(got, PathBuf::from(path));
        assert_eq!(driver.asked().len(), 3);
    }

    #[test]
    fn path_validation_messages() {
        assert_eq!(
            validate_path_str("  ", false, false, &[]),
            Err("Path cannot be empty".into())
        );
        assert_eq!(
            validate_path_str("data.arff", false, true, &["csv"]),
            Err("Expected a .csv file".into())
        );
        assert!(validate_path_str("DATA.CSV", false, true, &["csv"]).is_ok());
    }
}
