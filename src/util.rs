use anyhow::{anyhow, Result};
use serde_yaml::Value;
use std::path::Path;

/// Reads a whole file, naming its `kind` in the error message.
pub fn read_to_string(path: &Path, kind: &str) -> Result<String> {
    match std::fs::read_to_string(path) {
        Err(e) => Err(anyhow!("Reading {} file `{}`: {}", kind, path.display(), e)),
        Ok(contents) => Ok(contents),
    }
}

/// Converts a YAML scalar into its textual form. Returns `None` for nulls,
/// sequences and mappings.
pub(crate) fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Treats empty strings as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}
