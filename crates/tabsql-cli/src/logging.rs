//! Logging and tracing setup for the tabsql binary
//!
//! Logs always go to stderr so a script written with `--stdout` stays clean.
//! `RUST_LOG` takes precedence over the configured default filter.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Emit one JSON object per event instead of human-readable lines
    pub enable_json_logs: bool,

    /// Whether to include file/line information in logs
    pub include_location: bool,

    /// Whether to colorize console output
    pub ansi: bool,

    /// Default log level filter
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_json_logs: false,
            include_location: cfg!(debug_assertions),
            ansi: true,
            default_filter: "warn,tabsql_cli=info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Configuration for a `-v` count: 0 is the default, 1 adds info from every
    /// tabsql crate, 2 debug, 3 or more trace
    pub fn for_verbosity(verbosity: u8) -> Self {
        let default_filter = match verbosity {
            0 => return Self::default(),
            1 => "warn,tabsql_cli=info,tabsql_core=info,tabsql_schema=info,tabsql_interchange=info",
            2 => "info,tabsql_cli=debug,tabsql_core=debug,tabsql_schema=debug,tabsql_interchange=debug",
            _ => "trace",
        };
        Self {
            default_filter: default_filter.to_string(),
            ..Self::default()
        }
    }

    pub fn with_json(mut self, enabled: bool) -> Self {
        self.enable_json_logs = enabled;
        self
    }
}

/// Initialize the logging system with the given configuration
pub fn init(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let layer = if config.enable_json_logs {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_ansi(false)
            .json()
            .with_filter(env_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.include_location)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_ansi(config.ansi)
            .with_filter(env_filter)
            .boxed()
    };

    tracing_subscriber::registry().with(layer).try_init()?;

    tracing::debug!(
        json_enabled = config.enable_json_logs,
        filter = %config.default_filter,
        "Logging system initialized"
    );

    Ok(())
}
