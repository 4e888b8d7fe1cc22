//! Shared YAML/JSON loading.
//!
//! Every document (conformance reports, catalogs, catalog data sources)
//! enters the toolchain through [`load_document`], which yields a
//! `serde_json::Value` whatever the on-disk syntax so that schema checking
//! and typed decoding see one value model.
//!
//! A missing file is [`CatalogError::FileNotFound`]; any parse failure is
//! the single [`CatalogError::Malformed`] condition.

use std::path::Path;

use serde_json::Value;

use crate::error::{CatalogError, CatalogResult};

/// Load a document, choosing the parser by extension.
///
/// `.json` files are parsed as JSON; everything else as YAML.
pub fn load_document(path: &Path) -> CatalogResult<Value> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        load_json_value(path)
    } else {
        load_yaml_as_value(path)
    }
}

/// Load a YAML file and return it as a `serde_json::Value`.
pub fn load_yaml_as_value(path: &Path) -> CatalogResult<Value> {
    let content = read(path)?;
    parse_yaml(&content).map_err(|detail| CatalogError::Malformed {
        path: path.to_path_buf(),
        detail,
    })
}

/// Load a JSON file and return it as a `serde_json::Value`.
pub fn load_json_value(path: &Path) -> CatalogResult<Value> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|e| CatalogError::Malformed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Parse YAML text into a `serde_json::Value`.
pub fn parse_yaml(content: &str) -> Result<Value, String> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    yaml_to_json_value(yaml)
}

fn read(path: &Path) -> CatalogResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CatalogError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CatalogError::Io(e)
        }
    })
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Scalar mapping keys are stringified; tags are stripped. Non-finite floats
/// and non-scalar keys have no JSON form and are rejected.
fn yaml_to_json_value(yaml: serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("number {n} has no JSON representation"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s)),
        serde_yaml::Value::Sequence(seq) => seq
            .into_iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut obj = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => return Err(format!("unsupported mapping key: {other:?}")),
                };
                obj.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(obj))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(tagged.value),
    }
}
