//! tabsql Interchange - from tabular records to INSERT scripts
//!
//! ```text
//! CSV / TSV / JSON / XLSX → RecordSet ─┐
//!                                      ├→ ValueFormatter → InsertScriptWriter → script
//! SchemaCatalog + TableOrder ──────────┘
//! ```

mod csv_import;
mod insert_script;
mod json_import;
mod loader;
mod records;
mod spreadsheet_import;
mod value_format;

pub use csv_import::{parse_csv, read_csv_file, sanitize_column_name};
pub use insert_script::{InsertScriptWriter, ScriptSummary};
pub use json_import::{parse_json, read_json_file};
pub use loader::{RecordFormat, load_directory, load_into, load_table, table_name_for};
pub use records::{RecordSet, Row, TableRecords};
pub use spreadsheet_import::read_spreadsheet_file;
pub use value_format::{ValueFormatter, parse_datetime, quote_identifier, quote_string};
