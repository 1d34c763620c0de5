//! tabsql Schema - schema parsing and table ordering
//!
//! This crate provides:
//! - A parser for the `CREATE TABLE` / `ALTER TABLE ... ADD` subset of DDL
//! - Per-table column types and foreign-key targets
//! - Dependency resolution producing a safe insertion order

pub mod dependencies;
mod parser;

pub use parser::{PostConstraint, SchemaCatalog, TableSchema, parse_schema};

// Re-export dependency types for convenience
pub use dependencies::{Dependencies, DependencyGraph, TableOrder, resolve_table_order};
