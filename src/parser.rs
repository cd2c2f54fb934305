//! JSON decoding for payloads, specs and row datasets.

use anyhow::{Context, Result, bail};
use serde_json::Value;

/// Decodes a JSON document from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a single valid JSON document.
pub fn parse_json(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Reads and decodes a JSON file.
pub fn load_json(path: &str) -> Result<Value> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read '{path}'"))?;
    parse_json(&bytes).with_context(|| format!("Invalid JSON in '{path}'"))
}

/// Reads a JSON file holding an array of row objects.
pub fn load_rows(path: &str) -> Result<Vec<Value>> {
    match load_json(path)? {
        Value::Array(rows) => Ok(rows),
        other => bail!(
            "Expected an array of rows in '{path}', found {}",
            json_type(&other)
        ),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
