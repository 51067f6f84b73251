use anyhow::{Context, Result, anyhow, bail};
use schemars::{Schema, schema_for};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    /// One of a fixed set of string values, in declaration order.
    Choice(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub kind: FieldKind,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub exclusive_min: bool,
    pub exclusive_max: bool,
}

// Return the whole tagged-enum schema for T
pub fn schema_for<T: schemars::JsonSchema>() -> Schema {
    schema_for!(T)
}

pub fn specs_for_kind(root: &Schema, kind_key: &str) -> Result<Vec<FieldSpec>> {
    let root_obj = root.as_object().context("root schema is not an object")?;

    let alts = root_obj
        .get("oneOf")
        .or_else(|| root_obj.get("anyOf"))
        .and_then(|v| v.as_array())
        .context("missing oneOf/anyOf")?;

    for branch in alts {
        let bobj = branch.as_object().context("branch is not object")?;
        let Some(props) = bobj.get("properties").and_then(|v| v.as_object()) else {
            continue;
        };

        if !discriminant_matches(props, kind_key) {
            continue;
        }

        let Some(params_obj) = props
            .get("params")
            .and_then(|v| v.as_object())
            .and_then(|o| resolve_ref_obj(root_obj, o))
        else {
            return Ok(vec![]);
        };

        let Some(params_props) = params_obj.get("properties").and_then(|v| v.as_object()) else {
            return Ok(vec![]);
        };

        let required: Vec<String> = params_obj
            .get("required")
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let mut out = Vec::new();
        for (name, field_schema) in params_props {
            let outer = field_schema
                .as_object()
                .context("field schema not object")?;

            // Metadata sits next to the $ref; the type lives behind it.
            let fs_obj = resolve_ref_obj(root_obj, outer)
                .ok_or_else(|| anyhow!("failed to resolve field $ref for '{name}'"))?;
            let lookup = |key: &str| outer.get(key).or_else(|| fs_obj.get(key));

            let title = lookup("title")
                .and_then(|v| v.as_str())
                .unwrap_or(name)
                .to_string();

            let description = lookup("description")
                .and_then(|v| v.as_str())
                .map(str::to_string);

            let default = lookup("default").cloned();

            let Some(kind) = detect_choice(fs_obj).or_else(|| detect_field_kind(fs_obj.get("type")))
            else {
                continue;
            };

            let (min, exclusive_min) = bound(fs_obj, "minimum", "exclusiveMinimum");
            let (max, exclusive_max) = bound(fs_obj, "maximum", "exclusiveMaximum");

            out.push(FieldSpec {
                name: name.clone(),
                title,
                description,
                required: required.iter().any(|r| r == name),
                kind,
                default,
                min,
                max,
                exclusive_min,
                exclusive_max,
            });
        }

        return Ok(out);
    }

    bail!("no branch found for type={kind_key}");
}

fn discriminant_matches(props: &Map<String, Value>, kind_key: &str) -> bool {
    let Some(tobj) = props.get("type").and_then(|v| v.as_object()) else {
        return false;
    };

    if tobj.get("const").and_then(|v| v.as_str()) == Some(kind_key) {
        return true;
    }
    if let Some(arr) = tobj.get("enum").and_then(|v| v.as_array()) {
        if arr.len() == 1 && arr[0].as_str() == Some(kind_key) {
            return true;
        }
    }
    false
}

/// Resolve a local $ref like "#/$defs/SvmParameters" against the root object.
/// Returns the referenced object map, or None if it can't be resolved.
fn resolve_ref_obj<'a>(
    root_obj: &'a Map<String, Value>,
    obj: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    match obj.get("$ref") {
        Some(Value::String(r)) => {
            let path = r.strip_prefix("#/")?;
            let mut cur: &Map<String, Value> = root_obj;
            for raw_seg in path.split('/') {
                // JSON Pointer unescape (~1 => /, ~0 => ~)
                let seg = raw_seg.replace("~1", "/").replace("~0", "~");
                cur = cur.get(&seg)?.as_object()?;
            }
            Some(cur)
        }
        _ => Some(obj),
    }
}

/// Unit-variant enums come out either as `enum: [..]` or, when variants
/// carry docs, as `oneOf: [{const: ..}, ..]`.
fn detect_choice(obj: &Map<String, Value>) -> Option<FieldKind> {
    if let Some(values) = obj.get("enum").and_then(|v| v.as_array()) {
        let options: Vec<String> = values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        return (!options.is_empty()).then_some(FieldKind::Choice(options));
    }

    let branches = obj.get("oneOf").and_then(|v| v.as_array())?;
    let options: Option<Vec<String>> = branches
        .iter()
        .map(|b| {
            let b = b.as_object()?;
            b.get("const")
                .or_else(|| b.get("enum").and_then(|e| e.as_array()?.first()))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .collect();
    options
        .filter(|o| !o.is_empty())
        .map(FieldKind::Choice)
}

fn bound(obj: &Map<String, Value>, inclusive: &str, exclusive: &str) -> (Option<f64>, bool) {
    match obj.get(exclusive).and_then(|v| v.as_f64()) {
        Some(x) => (Some(x), true),
        None => (obj.get(inclusive).and_then(|v| v.as_f64()), false),
    }
}

fn detect_field_kind(ty: Option<&Value>) -> Option<FieldKind> {
    match ty {
        Some(Value::String(s)) => primitive_kind(s),
        Some(Value::Array(arr)) => {
            // handle unions like ["null","integer"] for Option<T>
            arr.iter().filter_map(|v| v.as_str()).find_map(primitive_kind)
        }
        _ => None,
    }
}

fn primitive_kind(ty: &str) -> Option<FieldKind> {
    match ty {
        "string" => Some(FieldKind::String),
        "integer" => Some(FieldKind::Integer),
        "number" => Some(FieldKind::Number),
        "boolean" => Some(FieldKind::Boolean),
        _ => None,
    }
}
