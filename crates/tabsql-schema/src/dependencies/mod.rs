//! Table Dependency Resolver
//!
//! This module turns the foreign keys of a parsed schema into a dependency graph
//! and a table insertion order.

mod resolver;


pub use resolver::{Dependencies, DependencyGraph, TableOrder, resolve_table_order};
