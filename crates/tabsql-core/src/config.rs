//! Generator configuration
//!
//! Loaded from an optional TOML file and then overridden by command-line flags.
//!
//! ```toml
//! surrogate_key = "id"
//! unknown_references = "error"
//! csv_delimiter = ";"
//! output_dir = "out"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Result, TabsqlError};

/// What to do with a foreign key that references a table the schema never defines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownReferencePolicy {
    /// Drop the edge and log a warning
    #[default]
    Ignore,
    /// Abort the run
    Error,
}

/// Settings shared by every stage of a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Column name replaced by the 1-based row index. `None` keeps source values.
    pub surrogate_key: Option<String>,
    /// Handling of foreign keys that point at undefined tables
    pub unknown_references: UnknownReferencePolicy,
    /// Field delimiter for `.csv` inputs
    pub csv_delimiter: char,
    /// Directory the generated script is written into
    pub output_dir: PathBuf,
    /// Appended to the script base name
    pub file_suffix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            surrogate_key: Some("id".to_string()),
            unknown_references: UnknownReferencePolicy::Ignore,
            csv_delimiter: ',',
            output_dir: PathBuf::from("output"),
            file_suffix: "_table.sql".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| TabsqlError::Configuration(e.to_string()))
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(TabsqlError::MissingInput(format!(
                "config file {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded generator config");
        Ok(config)
    }

    /// Set the surrogate key column
    pub fn with_surrogate_key(mut self, column: Option<impl Into<String>>) -> Self {
        self.surrogate_key = column.map(Into::into);
        self
    }

    /// Set the unknown reference policy
    pub fn with_unknown_references(mut self, policy: UnknownReferencePolicy) -> Self {
        self.unknown_references = policy;
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Path of the generated script for the given base name
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}{}", name, self.file_suffix))
    }
}
