//! The generation run: load inputs, resolve the table order, write the script

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tabsql_core::{GeneratorConfig, TabsqlError};
use tabsql_interchange::{InsertScriptWriter, RecordSet, ScriptSummary, ValueFormatter, load_into};
use tabsql_schema::{SchemaCatalog, TableOrder, parse_schema, resolve_table_order};

/// Default script base name when nothing better can be derived
const DEFAULT_SCRIPT_NAME: &str = "inserts";

/// Where the script goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptTarget {
    /// `<output_dir>/<name><file_suffix>`
    File { name: String },
    Stdout,
}

/// Inputs of one run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Schema text file; `None` infers the schema from the records
    pub schema: Option<PathBuf>,
    /// Record files or directories, loaded in order
    pub data: Vec<PathBuf>,
    /// Table name for a single data file
    pub table: Option<String>,
    pub target: ScriptTarget,
}

impl GenerateOptions {
    /// Script base name: the table name when one is given, else the stem of the
    /// first data path
    pub fn default_script_name(table: Option<&str>, data: &[PathBuf]) -> String {
        table
            .map(str::to_string)
            .or_else(|| {
                data.first()
                    .and_then(|path| path.file_stem())
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_SCRIPT_NAME.to_string())
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    /// Written script path, `None` for stdout
    pub path: Option<PathBuf>,
    pub order: TableOrder,
    pub summary: ScriptSummary,
}

/// Runs the pipeline with an explicit configuration
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Read and parse a schema file
    pub fn load_schema(&self, path: &Path) -> Result<SchemaCatalog> {
        if !path.is_file() {
            return Err(TabsqlError::MissingInput(format!(
                "schema file not found: {}",
                path.display()
            ))
            .into());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file {}", path.display()))?;
        let catalog = parse_schema(&text)
            .with_context(|| format!("Failed to parse schema file {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            tables = catalog.len(),
            constraints = catalog.constraints().len(),
            "parsed schema"
        );
        Ok(catalog)
    }

    /// Load every data input into one record set
    pub fn load_records(&self, options: &GenerateOptions) -> Result<RecordSet> {
        if options.data.is_empty() {
            return Err(TabsqlError::MissingInput("no data files given".to_string()).into());
        }
        if options.table.is_some() && options.data.len() > 1 {
            tracing::warn!("a table name applies to a single data file, using it for the first only");
        }

        let mut records = RecordSet::new();
        for (index, path) in options.data.iter().enumerate() {
            let table = if index == 0 { options.table.as_deref() } else { None };
            load_into(&mut records, path, table, &self.config)
                .with_context(|| format!("Failed to load records from {}", path.display()))?;
        }
        Ok(records)
    }

    /// Schema and insertion order for a run. Without a schema file the catalog is
    /// inferred from the records and tables keep their load order.
    pub fn plan(
        &self,
        options: &GenerateOptions,
        records: &RecordSet,
    ) -> Result<(SchemaCatalog, TableOrder)> {
        match &options.schema {
            Some(path) => {
                let catalog = self.load_schema(path)?;
                let order = resolve_table_order(&catalog, self.config.unknown_references)
                    .context("Failed to resolve table order")?;
                Ok((catalog, order))
            }
            None => {
                tracing::info!("no schema given, inferring column types from the records");
                let catalog = records.infer_catalog();
                let order = TableOrder::from_names(records.table_names());
                Ok((catalog, order))
            }
        }
    }

    /// Load and plan a run, then stream its script into `out`.
    ///
    /// Each table section reaches `out` as soon as it is formatted.
    pub fn write_script<W: Write>(
        &self,
        options: &GenerateOptions,
        out: &mut W,
    ) -> Result<(TableOrder, ScriptSummary)> {
        let records = self.load_records(options)?;
        let (catalog, order) = self.plan(options, &records)?;
        let summary = self.emit(&catalog, &records, &order, out)?;
        Ok((order, summary))
    }

    fn emit<W: Write>(
        &self,
        catalog: &SchemaCatalog,
        records: &RecordSet,
        order: &TableOrder,
        out: &mut W,
    ) -> Result<ScriptSummary> {
        let formatter = ValueFormatter::from_config(&self.config);
        let summary = InsertScriptWriter::new(catalog, records, &formatter)
            .write(order, out)
            .context("Failed to generate insert script")?;
        Ok(summary)
    }

    /// Run the whole pipeline.
    ///
    /// File output goes through a temporary file in the output directory that is
    /// only persisted once the script is complete.
    pub fn run(&self, options: &GenerateOptions) -> Result<GenerateOutcome> {
        let name = match &options.target {
            ScriptTarget::Stdout => {
                let mut out = BufWriter::new(std::io::stdout().lock());
                let (order, summary) = self.write_script(options, &mut out)?;
                out.flush()
                    .context("Failed to write insert script to stdout")?;
                return Ok(GenerateOutcome {
                    path: None,
                    order,
                    summary,
                });
            }
            ScriptTarget::File { name } => name,
        };

        let records = self.load_records(options)?;
        let (catalog, order) = self.plan(options, &records)?;

        let path = self.config.output_file(name);
        let dir = &self.config.output_dir;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let temp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        let mut out = BufWriter::new(temp);
        let summary = self.emit(&catalog, &records, &order, &mut out)?;
        let temp = out
            .into_inner()
            .map_err(|e| e.into_error())
            .context("Failed to flush insert script")?;
        temp.persist(&path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!(path = %path.display(), rows = summary.rows_written, "wrote insert script");
        Ok(GenerateOutcome {
            path: Some(path),
            order,
            summary,
        })
    }
}
