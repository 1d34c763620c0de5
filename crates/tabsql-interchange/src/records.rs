//! In-memory tabular records
//!
//! Every loader produces a [`TableRecords`]: a header plus positional rows in
//! source order. Row order is significant, since the surrogate key is derived
//! from a row's position.

use indexmap::IndexMap;
use tabsql_core::{ColumnType, Value};
use tabsql_schema::{SchemaCatalog, TableSchema};

/// Header and rows loaded for one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRecords {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TableRecords {
    /// Create an empty table with the given header
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with nulls, long rows are truncated.
    pub fn push_row(&mut self, mut values: Vec<Value>) {
        values.resize(self.columns.len(), Value::Null);
        self.rows.push(values);
    }

    /// Builder form of [`TableRecords::push_row`]
    pub fn with_row(mut self, values: Vec<Value>) -> Self {
        self.push_row(values);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of `column` in the header.
    ///
    /// Exact matches win; otherwise the first ASCII case-insensitive match is used.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .or_else(|| self.columns.iter().position(|c| c.eq_ignore_ascii_case(column)))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            records: self,
            values,
        })
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            records: self,
            values,
        })
    }

    /// Cell at `row` for `column`; `None` when the header has no such column
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.row(row).and_then(|row| row.get(column))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Build a table schema from the header, inferring each column's type from its values
    pub fn infer_schema(&self, table: &str) -> TableSchema {
        let mut schema = TableSchema::new(table);
        for (index, column) in self.columns.iter().enumerate() {
            schema.add_column(column.clone(), ColumnType::infer(self.column_values(index)));
        }
        schema
    }
}

/// One row of a [`TableRecords`]
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    records: &'a TableRecords,
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Cell for `column`, or `None` when the header has no such column
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.records
            .column_index(column)
            .and_then(|index| self.values.get(index))
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

/// Records for every loaded table, keyed by table name in load order
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    tables: IndexMap<String, TableRecords>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records for a table. Loading the same table twice appends the later rows
    /// when the headers agree and replaces the earlier records otherwise.
    pub fn insert(&mut self, table: impl Into<String>, records: TableRecords) {
        let table = table.into();
        match self.tables.get_mut(&table) {
            Some(existing) if existing.columns == records.columns => {
                tracing::debug!(table = %table, rows = records.row_count(), "appending rows to loaded table");
                existing.rows.extend(records.rows);
            }
            Some(existing) => {
                tracing::warn!(table = %table, "table loaded twice with different headers, keeping the last");
                *existing = records;
            }
            None => {
                self.tables.insert(table, records);
            }
        }
    }

    pub fn get(&self, table: &str) -> Option<&TableRecords> {
        self.tables.get(table)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableRecords)> {
        self.tables.iter().map(|(name, records)| (name.as_str(), records))
    }

    pub fn into_tables(self) -> impl Iterator<Item = (String, TableRecords)> {
        self.tables.into_iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Schema-less mode: one inferred table schema per loaded table, in load order
    pub fn infer_catalog(&self) -> SchemaCatalog {
        let mut catalog = SchemaCatalog::new();
        for (name, records) in &self.tables {
            catalog.insert_table(records.infer_schema(name));
        }
        catalog
    }
}
