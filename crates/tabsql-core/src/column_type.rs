//! Column type categories
//!
//! Declared SQL type tokens are folded once, at parse time, into a closed set of
//! categories. The value formatter dispatches on these categories only.

use serde::{Deserialize, Serialize};

use crate::Value;

/// Category of a declared SQL column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Integer types (INT, BIGINT, SERIAL, ...)
    Integer,
    /// Floating point and fixed precision (FLOAT, DOUBLE, DECIMAL, ...)
    Float,
    /// Date and time (DATETIME, TIMESTAMP)
    DateTime,
    /// Everything else is written as a quoted string
    #[default]
    Text,
}

impl ColumnType {
    /// Map a declared type token (e.g. `INT`, `varchar`, `DECIMAL(10,2)`) to its category.
    ///
    /// Only the leading word of the token is inspected; length and precision
    /// arguments are ignored.
    pub fn from_type_token(token: &str) -> Self {
        let base = token
            .trim()
            .split(|c: char| c == '(' || c.is_whitespace())
            .next()
            .unwrap_or("")
            .to_ascii_uppercase();

        match base.as_str() {
            "INT" | "INTEGER" | "BIGINT" | "SMALLINT" | "TINYINT" | "MEDIUMINT" | "INT2"
            | "INT4" | "INT8" | "SERIAL" | "BIGSERIAL" | "SMALLSERIAL" => ColumnType::Integer,
            "FLOAT" | "FLOAT4" | "FLOAT8" | "DOUBLE" | "REAL" | "DECIMAL" | "NUMERIC"
            | "DEC" | "FIXED" => ColumnType::Float,
            "DATETIME" | "TIMESTAMP" | "TIMESTAMPTZ" => ColumnType::DateTime,
            _ => ColumnType::Text,
        }
    }

    /// Infer a category from a column of sample values, ignoring nulls.
    ///
    /// All integers gives `Integer`, all numeric gives `Float`, anything else `Text`.
    /// A column made only of nulls is `Text`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut seen = false;
        let mut all_integer = true;
        let mut all_numeric = true;

        for value in values {
            let (is_int, is_num) = match value {
                Value::Null => continue,
                Value::Int64(_) => (true, true),
                Value::Float64(_) => (false, true),
                Value::String(s) => {
                    let s = s.trim();
                    let is_int = s.parse::<i64>().is_ok();
                    (is_int, is_int || s.parse::<f64>().is_ok_and(f64::is_finite))
                }
                Value::Bool(_) | Value::DateTime(_) => (false, false),
            };
            seen = true;
            all_integer &= is_int;
            all_numeric &= is_num;
            if !all_numeric {
                break;
            }
        }

        match (seen, all_integer, all_numeric) {
            (true, true, _) => ColumnType::Integer,
            (true, false, true) => ColumnType::Float,
            _ => ColumnType::Text,
        }
    }

    /// Human readable family name
    pub fn family_name(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::DateTime => "datetime",
            ColumnType::Text => "text",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.family_name())
    }
}
