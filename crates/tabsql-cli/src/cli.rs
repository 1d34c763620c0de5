//! tabsql command line
//!
//! ```text
//! tabsql --schema schema.sql --data data/ --output out
//! tabsql -d users.csv -t users --stdout
//! ```

mod generate;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tabsql_core::{GeneratorConfig, TabsqlError, UnknownReferencePolicy};

use generate::{GenerateOptions, Generator, ScriptTarget};

/// Turn CSV, TSV, JSON and Excel records into an ordered SQL INSERT script
#[derive(Debug, Parser)]
#[command(name = "tabsql", version, about)]
struct Cli {
    /// Schema file with CREATE TABLE statements; omit to infer column types
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Record file (.csv, .tsv, .json, .xlsx) or a directory of them
    #[arg(short, long, value_name = "PATH", required = true)]
    data: Vec<PathBuf>,

    /// Table name for a single data file (defaults to the file stem)
    #[arg(short, long)]
    table: Option<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Script base name; the file is `<output>/<name>_table.sql`
    #[arg(short, long)]
    name: Option<String>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "TABSQL_CONFIG")]
    config: Option<PathBuf>,

    /// Write the script to stdout instead of a file
    #[arg(long)]
    stdout: bool,

    /// Keep source values for the `id` column instead of numbering rows
    #[arg(long)]
    no_surrogate_key: bool,

    /// Fail when a foreign key references an undefined table
    #[arg(long)]
    strict_references: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Configuration file values with command line flags applied on top
    fn generator_config(&self) -> Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => GeneratorConfig::default(),
        };

        if let Some(dir) = &self.output {
            config = config.with_output_dir(dir);
        }
        if self.no_surrogate_key {
            config = config.with_surrogate_key(None::<String>);
        }
        if self.strict_references {
            config = config.with_unknown_references(UnknownReferencePolicy::Error);
        }
        Ok(config)
    }

    fn generate_options(&self) -> GenerateOptions {
        let target = if self.stdout {
            ScriptTarget::Stdout
        } else {
            ScriptTarget::File {
                name: self.name.clone().unwrap_or_else(|| {
                    GenerateOptions::default_script_name(self.table.as_deref(), &self.data)
                }),
            }
        };

        GenerateOptions {
            schema: self.schema.clone(),
            data: self.data.clone(),
            table: self.table.clone(),
            target,
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.generator_config()?;
    let generator = Generator::new(config);
    let outcome = generator.run(&cli.generate_options())?;

    tracing::info!(
        tables = outcome.order.len(),
        written = outcome.summary.tables_written.len(),
        rows = outcome.summary.rows_written,
        "generation finished"
    );
    if let Some(path) = &outcome.path {
        eprintln!("Output file path: {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = logging::LoggingConfig::for_verbosity(cli.verbose).with_json(cli.log_json);
    if let Err(e) = logging::init(logging) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "generation failed");
            eprintln!("Error: {e:#}");
            let input_error = e
                .downcast_ref::<TabsqlError>()
                .is_some_and(TabsqlError::is_input_error);
            if input_error {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
