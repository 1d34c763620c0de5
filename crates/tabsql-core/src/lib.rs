//! tabsql core - shared types for the insert-script generator
//!
//! This crate provides the types every other tabsql crate depends on:
//!
//! - `Value` - an untyped cell read from a tabular input
//! - `ColumnType` - the closed set of type categories the formatter understands
//! - `GeneratorConfig` - run settings loaded from TOML and CLI flags
//! - `TabsqlError` - the error type shared by the pipeline

mod column_type;
mod config;
mod error;
mod types;

pub use column_type::*;
pub use config::*;
pub use error::*;
pub use types::*;
