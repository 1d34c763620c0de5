//! Spreadsheet import functionality
//!
//! Reads the first worksheet of an Excel workbook. The first non-empty row is
//! the header; empty cells are null.

use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;
use tabsql_core::{Result, TabsqlError, Value};

use crate::csv_import::sanitize_column_name;
use crate::records::TableRecords;
use crate::value_format::parse_datetime;

/// Read the first worksheet of a workbook from disk
pub fn read_spreadsheet_file(path: &Path) -> Result<TableRecords> {
    let spreadsheet_error =
        |e: calamine::Error| TabsqlError::Spreadsheet(format!("{}: {}", path.display(), e));

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
    let sheet_name = workbook.sheet_names().first().cloned().unwrap_or_default();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            TabsqlError::Spreadsheet(format!("{}: workbook has no worksheets", path.display()))
        })?
        .map_err(spreadsheet_error)?;

    let mut rows = range
        .rows()
        .filter(|row| !row.iter().all(|cell| matches!(cell, Data::Empty)));

    let Some(header) = rows.next() else {
        return Err(TabsqlError::Parse {
            line: 1,
            message: format!("{}: missing header row", path.display()),
        });
    };
    let columns = header
        .iter()
        .map(|cell| sanitize_column_name(&cell.to_string()))
        .collect();

    let mut records = TableRecords::new(columns);
    for row in rows {
        records.push_row(row.iter().map(cell_to_value).collect());
    }

    tracing::debug!(
        path = %path.display(),
        sheet = %sheet_name,
        columns = records.columns().len(),
        rows = records.row_count(),
        "read spreadsheet"
    );
    Ok(records)
}

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(v) => Value::Int64(*v),
        Data::Float(v) => integral(*v).map_or(Value::Float64(*v), Value::Int64),
        Data::Bool(v) => Value::Bool(*v),
        Data::String(s) => Value::String(s.clone()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or(Value::Float64(dt.as_f64()), Value::DateTime),
        Data::DateTimeIso(s) => {
            parse_datetime(s).map_or_else(|| Value::String(s.clone()), Value::DateTime)
        }
        Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(e) => {
            tracing::warn!(error = %e, "spreadsheet cell holds an error, reading it as null");
            Value::Null
        }
    }
}

/// Whole-number floats come back from Excel for integer cells
fn integral(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.abs() < 9.007_199_254_740_992e15).then(|| value as i64)
}
