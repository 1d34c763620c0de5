//! INSERT script generation
//!
//! Writes one section per table in dependency order, then the deferred
//! `ALTER TABLE` statements. Each section is fully formatted before any of it
//! reaches the sink, so a coercion failure never leaves a half-written
//! statement behind.

use std::io::Write;
use tabsql_core::Result;
use tabsql_schema::{SchemaCatalog, TableOrder, TableSchema};

use crate::records::{RecordSet, TableRecords};
use crate::value_format::{ValueFormatter, quote_identifier};

const BANNER_RULE: &str = "-----------------------------------------------------";
const SECTION_RULE: &str = "---------------------------------------------------";

/// What a script run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Tables that received an INSERT statement
    pub tables_written: Vec<String>,
    /// Tables in the order with no records, emitted as a banner only
    pub tables_without_records: Vec<String>,
    /// Record tables with no schema entry, left out of the script
    pub tables_skipped: Vec<String>,
    pub rows_written: usize,
    pub constraints_written: usize,
}

/// Emits INSERT scripts for a schema and its records
#[derive(Debug, Clone, Copy)]
pub struct InsertScriptWriter<'a> {
    catalog: &'a SchemaCatalog,
    records: &'a RecordSet,
    formatter: &'a ValueFormatter,
}

impl<'a> InsertScriptWriter<'a> {
    pub fn new(
        catalog: &'a SchemaCatalog,
        records: &'a RecordSet,
        formatter: &'a ValueFormatter,
    ) -> Self {
        Self {
            catalog,
            records,
            formatter,
        }
    }

    /// Write the whole script for `order` to `out`
    pub fn write<W: Write>(&self, order: &TableOrder, out: &mut W) -> Result<ScriptSummary> {
        let mut summary = ScriptSummary {
            tables_skipped: self.unmatched_record_tables(order),
            ..ScriptSummary::default()
        };

        for table in order.iter() {
            let section = self.table_section(table)?;
            out.write_all(section.text.as_bytes())?;

            match section.rows {
                Some(rows) => {
                    tracing::info!(table = %table, rows, "generated insert statement");
                    summary.tables_written.push(table.to_string());
                    summary.rows_written += rows;
                }
                None => {
                    tracing::debug!(table = %table, "no records for table, banner only");
                    summary.tables_without_records.push(table.to_string());
                }
            }
        }

        for constraint in self.catalog.constraints() {
            writeln!(out, "{}", constraint.to_sql())?;
            summary.constraints_written += 1;
        }

        out.flush()?;
        Ok(summary)
    }

    fn unmatched_record_tables(&self, order: &TableOrder) -> Vec<String> {
        self.records
            .table_names()
            .filter(|name| order.position(name).is_none())
            .map(|name| {
                if self.catalog.contains(name) {
                    tracing::warn!(table = %name, "records for table outside the resolved order, skipping");
                } else {
                    tracing::warn!(table = %name, "records for table with no schema definition, skipping");
                }
                name.to_string()
            })
            .collect()
    }

    fn table_section(&self, table: &str) -> Result<Section> {
        let mut text = banner(table);

        let schema = self.catalog.get(table);
        let records = self.records.get(table).filter(|records| !records.is_empty());

        let rows = match (schema, records) {
            (Some(schema), Some(records)) if !schema.columns().is_empty() => {
                self.insert_statement(schema, records, &mut text)?;
                Some(records.row_count())
            }
            (Some(_), Some(_)) => {
                tracing::warn!(table = %table, "table declares no columns, skipping its records");
                None
            }
            _ => None,
        };

        Ok(Section { text, rows })
    }

    fn insert_statement(
        &self,
        schema: &TableSchema,
        records: &TableRecords,
        text: &mut String,
    ) -> Result<()> {
        for column in records.columns() {
            if !schema.column_names().any(|c| c.eq_ignore_ascii_case(column)) {
                tracing::debug!(table = %schema.name(), column = %column, "record column not in schema, ignoring");
            }
        }

        let columns: Vec<String> = schema.column_names().map(quote_identifier).collect();
        text.push_str(&format!(
            "INSERT INTO {} ({}) VALUES\n",
            quote_identifier(schema.name()),
            columns.join(", ")
        ));

        let mut tuples = Vec::with_capacity(records.row_count());
        for (index, row) in records.rows().enumerate() {
            let row_index = index + 1;
            let values = schema
                .column_names()
                .map(|column| self.formatter.format(&row, row_index, column, schema))
                .collect::<Result<Vec<_>>>()?;
            tuples.push(format!("({})", values.join(", ")));
        }

        text.push_str(&tuples.join(",\n"));
        text.push_str(";\n\n");
        text.push_str(SECTION_RULE);
        text.push_str("\n\n");
        Ok(())
    }
}

struct Section {
    text: String,
    /// Rows inserted, `None` for a banner-only section
    rows: Option<usize>,
}

fn banner(table: &str) -> String {
    format!("{BANNER_RULE}\n--- Inserting data into table {table} ---\n{BANNER_RULE}\n\n")
}

#[cfg(test)]
mod tests;
