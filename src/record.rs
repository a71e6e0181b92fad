use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::domain::RosterError;

/// One row of input data. Key order is the order of the source document.
pub type Record = Map<String, Value>;

/// Sample dataset shipped with the binary.
pub const EMBEDDED_RECORDS: &str = include_str!("../data/employees.json");

pub fn parse_records(json: &str) -> Result<Vec<Record>, RosterError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(RosterError::InvalidDataset(
            "expected a JSON array of records".into(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(RosterError::InvalidDataset(format!(
                "element {idx} is not an object but {}",
                json_kind(&other)
            ))),
        })
        .collect()
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<Record>, RosterError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => RosterError::FileNotFound,
        ErrorKind::PermissionDenied => RosterError::PermissionDenied,
        _ => RosterError::IoError(e),
    })?;
    let records = parse_records(&content)?;
    info!("Loaded {} records", records.len());
    Ok(records)
}

/// Text form of a value as used by search and export.
///
/// Null becomes the empty string, so a missing value never matches a
/// non-empty search term.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            // `75000.0` reads as `75000`.
            Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.0}"),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
