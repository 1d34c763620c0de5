//! Error types for tabsql

use thiserror::Error;

/// Core error type for insert-script generation
#[derive(Error, Debug)]
pub enum TabsqlError {
    #[error("Input not found: {0}")]
    MissingInput(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Cyclic dependency between tables: {}", tables.join(", "))]
    CyclicDependency { tables: Vec<String> },

    #[error(
        "Cannot convert value '{value}' to {expected} for column '{column}' of table '{table}' (row {row})"
    )]
    TypeCoercion {
        table: String,
        column: String,
        row: usize,
        value: String,
        expected: String,
    },

    #[error("Table '{table}' references undefined table '{referenced}'")]
    UnknownTableReference { table: String, referenced: String },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TabsqlError {
    /// Whether this error was raised while loading inputs, before any generation work.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TabsqlError::MissingInput(_) | TabsqlError::UnsupportedFormat(_) | TabsqlError::Io(_)
        )
    }
}

/// Result type alias for tabsql operations
pub type Result<T> = std::result::Result<T, TabsqlError>;
