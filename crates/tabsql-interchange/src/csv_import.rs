//! CSV import functionality
//!
//! Reads delimited text into [`TableRecords`]. The first record is the header;
//! quoted fields may contain the delimiter, doubled quotes and line breaks.

use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use tabsql_core::{Result, TabsqlError, Value};

use crate::records::TableRecords;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").expect("valid regex"));

const BOM: char = '\u{feff}';

/// Normalize a header cell into a column name: trimmed, with every run of
/// non-word characters replaced by `_`
pub fn sanitize_column_name(name: &str) -> String {
    NON_WORD.replace_all(name.trim(), "_").into_owned()
}

/// Read a CSV file from disk
pub fn read_csv_file(path: &Path, delimiter: char) -> Result<TableRecords> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            TabsqlError::MissingInput(format!("{}: {}", path.display(), e))
        }
        _ => TabsqlError::Io(e),
    })?;
    let records = parse_csv(BufReader::new(file), delimiter)?;
    tracing::debug!(
        path = %path.display(),
        columns = records.columns().len(),
        rows = records.row_count(),
        "read CSV file"
    );
    Ok(records)
}

/// Parse CSV text from any buffered reader
pub fn parse_csv<R: BufRead>(reader: R, delimiter: char) -> Result<TableRecords> {
    let mut header: Option<Vec<String>> = None;
    let mut records = TableRecords::default();
    let mut builder = RecordBuilder::default();
    let mut record_line = 0;

    for (index, line_result) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line_result?;
        let line = if index == 0 {
            line.strip_prefix(BOM).unwrap_or(&line).to_string()
        } else {
            line
        };

        if !builder.in_record() {
            if line.trim().is_empty() {
                continue;
            }
            record_line = line_number;
        }

        if !builder.feed_line(&line, delimiter) {
            continue;
        }
        let fields = builder.take_fields();

        match &header {
            None => {
                let columns: Vec<String> = fields
                    .into_iter()
                    .map(|field| sanitize_column_name(&field.text))
                    .collect();
                records = TableRecords::new(columns.clone());
                header = Some(columns);
            }
            Some(columns) => {
                if fields.len() > columns.len() {
                    return Err(TabsqlError::Parse {
                        line: record_line,
                        message: format!(
                            "row has {} fields but the header has {}",
                            fields.len(),
                            columns.len()
                        ),
                    });
                }
                records.push_row(fields.into_iter().map(CsvField::into_value).collect());
            }
        }
    }

    if builder.in_record() {
        return Err(TabsqlError::Parse {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if header.is_none() {
        return Err(TabsqlError::Parse {
            line: 1,
            message: "missing header row".to_string(),
        });
    }

    Ok(records)
}

#[derive(Debug, Default)]
struct CsvField {
    text: String,
    quoted: bool,
}

impl CsvField {
    /// An unquoted empty field is a null cell; `""` is an empty string.
    fn into_value(self) -> Value {
        if self.text.is_empty() && !self.quoted {
            Value::Null
        } else {
            Value::String(self.text)
        }
    }
}

/// Accumulates the fields of one record, which may span several lines
#[derive(Debug, Default)]
struct RecordBuilder {
    fields: Vec<CsvField>,
    current: String,
    quoted: bool,
    in_quotes: bool,
    /// Length of `current` when its closing quote was seen
    quoted_len: usize,
}

impl RecordBuilder {
    fn in_record(&self) -> bool {
        self.in_quotes
    }

    /// Consume one physical line. Returns `true` once the record is complete.
    fn feed_line(&mut self, line: &str, delimiter: char) -> bool {
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            if self.in_quotes {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        // Escaped quote
                        chars.next();
                        self.current.push('"');
                    } else {
                        self.in_quotes = false;
                        self.quoted_len = self.current.len();
                    }
                } else {
                    self.current.push(c);
                }
            } else if c == '"' && !self.quoted && self.current.trim().is_empty() {
                self.current.clear();
                self.quoted = true;
                self.in_quotes = true;
            } else if c == delimiter {
                self.finish_field();
            } else {
                self.current.push(c);
            }
        }

        if self.in_quotes {
            self.current.push('\n');
            return false;
        }
        self.finish_field();
        true
    }

    fn finish_field(&mut self) {
        let text = if self.quoted {
            let (inside, trailing) = self.current.split_at(self.quoted_len);
            if trailing.trim().is_empty() {
                inside.to_string()
            } else {
                self.current.clone()
            }
        } else {
            self.current.trim().to_string()
        };
        self.fields.push(CsvField {
            text,
            quoted: self.quoted,
        });
        self.current.clear();
        self.quoted = false;
        self.quoted_len = 0;
    }

    fn take_fields(&mut self) -> Vec<CsvField> {
        std::mem::take(&mut self.fields)
    }
}
