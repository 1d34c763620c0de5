//! Record source loading
//!
//! Picks a reader from the file extension and collects tables into a
//! [`RecordSet`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tabsql_core::{GeneratorConfig, Result, TabsqlError};

use crate::csv_import::read_csv_file;
use crate::json_import::read_json_file;
use crate::records::{RecordSet, TableRecords};
use crate::spreadsheet_import::read_spreadsheet_file;

/// Supported record file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// Comma separated (or the configured delimiter)
    Csv,
    /// Tab separated
    Tsv,
    /// Array of JSON objects
    Json,
    /// First worksheet of an Excel workbook
    Xlsx,
}

impl RecordFormat {
    /// Detect the format from a file extension, case-insensitively
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("tsv") => Ok(Self::Tsv),
            Some("json") => Ok(Self::Json),
            Some("xlsx" | "xls") => Ok(Self::Xlsx),
            _ => Err(TabsqlError::UnsupportedFormat(format!(
                "{}: expected a .csv, .tsv, .json or .xlsx file",
                path.display()
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Table name for a records file: its file stem
pub fn table_name_for(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            TabsqlError::MissingInput(format!("{}: cannot derive a table name", path.display()))
        })
}

/// Load one records file
pub fn load_table(path: &Path, config: &GeneratorConfig) -> Result<TableRecords> {
    let format = RecordFormat::from_path(path)?;
    if !path.is_file() {
        return Err(TabsqlError::MissingInput(format!(
            "input file not found: {}",
            path.display()
        )));
    }

    tracing::info!(path = %path.display(), format = %format, "loading records");
    match format {
        RecordFormat::Csv => read_csv_file(path, config.csv_delimiter),
        RecordFormat::Tsv => read_csv_file(path, '\t'),
        RecordFormat::Json => read_json_file(path),
        RecordFormat::Xlsx => read_spreadsheet_file(path),
    }
}

/// Load every supported file in `dir`, in file-name order.
///
/// Files with other extensions are skipped.
pub fn load_directory(dir: &Path, config: &GeneratorConfig) -> Result<RecordSet> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    paths.sort();

    let mut records = RecordSet::new();
    for path in paths {
        if !path.is_file() {
            continue;
        }
        if RecordFormat::from_path(&path).is_err() {
            tracing::debug!(path = %path.display(), "skipping file with unsupported extension");
            continue;
        }
        let table = table_name_for(&path)?;
        records.insert(table, load_table(&path, config)?);
    }

    if records.is_empty() {
        tracing::warn!(dir = %dir.display(), "no record files found in directory");
    }
    Ok(records)
}

/// Load a file or directory into `records`.
///
/// `table` names the table for a single file and defaults to the file stem; it
/// is ignored for directories.
pub fn load_into(
    records: &mut RecordSet,
    path: &Path,
    table: Option<&str>,
    config: &GeneratorConfig,
) -> Result<()> {
    if path.is_dir() {
        if table.is_some() {
            tracing::warn!(path = %path.display(), "table name is ignored for a directory input");
        }
        for (name, loaded) in load_directory(path, config)?.into_tables() {
            records.insert(name, loaded);
        }
        return Ok(());
    }

    let name = match table {
        Some(name) => name.to_string(),
        None => table_name_for(path)?,
    };
    records.insert(name, load_table(path, config)?);
    Ok(())
}
