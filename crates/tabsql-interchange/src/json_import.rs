//! JSON import functionality
//!
//! Accepts a top-level array of objects. The header is the union of all keys in
//! first-seen order; a key missing from an object is a null cell.

use indexmap::IndexSet;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use tabsql_core::{Result, TabsqlError, Value};

use crate::records::TableRecords;

/// Read a JSON records file from disk
pub fn read_json_file(path: &Path) -> Result<TableRecords> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            TabsqlError::MissingInput(format!("{}: {}", path.display(), e))
        }
        _ => TabsqlError::Io(e),
    })?;
    let records = parse_json(&text)?;
    tracing::debug!(
        path = %path.display(),
        columns = records.columns().len(),
        rows = records.row_count(),
        "read JSON file"
    );
    Ok(records)
}

/// Parse JSON records text
pub fn parse_json(text: &str) -> Result<TableRecords> {
    let document: JsonValue = serde_json::from_str(text)?;
    let JsonValue::Array(items) = document else {
        return Err(TabsqlError::Parse {
            line: 1,
            message: "expected a top-level array of objects".to_string(),
        });
    };

    let mut objects = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            JsonValue::Object(map) => objects.push(map),
            other => {
                return Err(TabsqlError::Parse {
                    line: 1,
                    message: format!(
                        "element {} is {}, expected an object",
                        index,
                        json_kind(&other)
                    ),
                });
            }
        }
    }

    let columns: IndexSet<String> = objects
        .iter()
        .flat_map(|object| object.keys().cloned())
        .collect();
    let mut records = TableRecords::new(columns.iter().cloned().collect());

    for mut object in objects {
        let row = columns
            .iter()
            .map(|column| object.remove(column).map(json_to_value).unwrap_or(Value::Null))
            .collect();
        records.push_row(row);
    }

    Ok(records)
}

fn json_to_value(value: JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int64(i),
            None => n.as_f64().map(Value::Float64).unwrap_or(Value::Null),
        },
        JsonValue::String(s) => Value::String(s),
        nested @ (JsonValue::Array(_) | JsonValue::Object(_)) => Value::String(nested.to_string()),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
