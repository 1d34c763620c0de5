//! SQL literal formatting
//!
//! Turns one cell plus its column's declared type category into the text that
//! goes inside a `VALUES` tuple.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tabsql_core::{ColumnType, GeneratorConfig, Result, TabsqlError, Value};
use tabsql_schema::TableSchema;

use crate::records::Row;

const NULL: &str = "NULL";

/// Layout of a rendered date-time literal
const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted input layouts for date-time cells, tried in order
const DATETIME_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Formats cells into SQL literals.
///
/// Formatting is pure: the same arguments always produce the same literal.
#[derive(Debug, Clone, Default)]
pub struct ValueFormatter {
    surrogate_key: Option<String>,
}

impl ValueFormatter {
    /// Formatter with an explicit surrogate key column (`None` disables it)
    pub fn new(surrogate_key: Option<String>) -> Self {
        Self { surrogate_key }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.surrogate_key.clone())
    }

    fn is_surrogate_key(&self, column: &str) -> bool {
        self.surrogate_key
            .as_deref()
            .is_some_and(|key| key.eq_ignore_ascii_case(column))
    }

    /// Format `column` of `row`, the `row_index`-th (1-based) row of `table`.
    ///
    /// Columns the table does not declare are formatted as text.
    pub fn format(
        &self,
        row: &Row<'_>,
        row_index: usize,
        column: &str,
        table: &TableSchema,
    ) -> Result<String> {
        self.format_cell(
            row.get(column),
            row_index,
            column,
            table.column_type(column).unwrap_or_default(),
            table.name(),
        )
    }

    /// Format a cell that has already been looked up.
    ///
    /// `cell` is `None` when the record has no such column.
    pub fn format_cell(
        &self,
        cell: Option<&Value>,
        row_index: usize,
        column: &str,
        column_type: ColumnType,
        table: &str,
    ) -> Result<String> {
        if self.is_surrogate_key(column) {
            return Ok(row_index.to_string());
        }

        let Some(value) = cell else {
            return Ok(NULL.to_string());
        };
        if value.is_null() || (column_type != ColumnType::Text && is_blank(value)) {
            return Ok(NULL.to_string());
        }

        let formatted = match column_type {
            ColumnType::Integer => format_integer(value),
            ColumnType::Float => format_float(value),
            ColumnType::DateTime => format_datetime(value),
            ColumnType::Text => Some(quote_string(&value.to_string())),
        };

        formatted.ok_or_else(|| TabsqlError::TypeCoercion {
            table: table.to_string(),
            column: column.to_string(),
            row: row_index,
            value: value.to_string(),
            expected: column_type.family_name().to_string(),
        })
    }
}

fn is_blank(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.trim().is_empty())
}

/// Quote a string literal, doubling embedded single quotes
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote an identifier with backticks, doubling embedded backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn truncate_to_i64(value: f64) -> Option<i64> {
    let truncated = value.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Some(truncated as i64)
    } else {
        None
    }
}

fn format_integer(value: &Value) -> Option<String> {
    let integer = match value {
        Value::Int64(v) => *v,
        Value::Float64(v) => truncate_to_i64(*v)?,
        Value::Bool(v) => i64::from(*v),
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(v) => v,
                Err(_) => truncate_to_i64(s.parse::<f64>().ok()?)?,
            }
        }
        Value::Null | Value::DateTime(_) => return None,
    };
    Some(integer.to_string())
}

fn format_float(value: &Value) -> Option<String> {
    let float = match value {
        Value::Int64(v) => *v as f64,
        Value::Float64(v) => *v,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Null | Value::Bool(_) | Value::DateTime(_) => return None,
    };
    float.is_finite().then(|| float_literal(float))
}

/// Shortest round-trip decimal form; integral values keep a trailing `.0`
fn float_literal(value: f64) -> String {
    let mut text = value.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

fn format_datetime(value: &Value) -> Option<String> {
    let datetime = match value {
        Value::DateTime(dt) => *dt,
        Value::String(s) => parse_datetime(s)?,
        _ => return None,
    };
    Some(quote_string(&datetime.format(SQL_DATETIME_FORMAT).to_string()))
}

/// Parse a date-time cell. A bare date is taken as midnight; an RFC 3339 offset
/// is normalized to UTC.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Some(dt) = DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
