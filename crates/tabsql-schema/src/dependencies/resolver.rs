//! Foreign-key dependency resolution
//!
//! Builds the table dependency graph from a parsed schema and orders tables so
//! that every referenced table is populated before the tables that reference it.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::VecDeque;
use tabsql_core::{Result, TabsqlError, UnknownReferencePolicy};

use crate::parser::SchemaCatalog;

/// Edges of one table in the dependency graph
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dependencies {
    /// Tables that must be populated before this one
    pub depends_on: Vec<String>,
    /// Tables that reference this one
    pub depended_by: Vec<String>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_dependency(&mut self, table: &str) -> bool {
        if self.depends_on.iter().any(|t| t == table) {
            return false;
        }
        self.depends_on.push(table.to_string());
        true
    }

    fn add_dependent(&mut self, table: &str) {
        if !self.depended_by.iter().any(|t| t == table) {
            self.depended_by.push(table.to_string());
        }
    }
}

/// Table dependency graph keyed by table name, in discovery order
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    nodes: IndexMap<String, Dependencies>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for every table in `catalog`.
    ///
    /// Self-references never constrain insert order and are dropped. References to
    /// tables the catalog does not define are dropped or rejected per `policy`.
    pub fn from_catalog(catalog: &SchemaCatalog, policy: UnknownReferencePolicy) -> Result<Self> {
        let mut graph = Self::new();

        for table in catalog.tables() {
            graph.add_table(table.name());
        }

        for table in catalog.tables() {
            for referenced in table.references() {
                if referenced == table.name() {
                    tracing::debug!(table = %table.name(), "ignoring self-referencing foreign key");
                    continue;
                }
                if !catalog.contains(referenced) {
                    match policy {
                        UnknownReferencePolicy::Ignore => {
                            tracing::warn!(
                                table = %table.name(),
                                referenced = %referenced,
                                "foreign key references an undefined table, ignoring"
                            );
                            continue;
                        }
                        UnknownReferencePolicy::Error => {
                            return Err(TabsqlError::UnknownTableReference {
                                table: table.name().to_string(),
                                referenced: referenced.clone(),
                            });
                        }
                    }
                }
                graph.add_edge(table.name(), referenced);
            }
        }

        Ok(graph)
    }

    /// Add a table with no edges. Existing tables are left untouched.
    pub fn add_table(&mut self, table: &str) {
        if !self.nodes.contains_key(table) {
            self.nodes.insert(table.to_string(), Dependencies::new());
        }
    }

    /// Record that `table` must be populated after `referenced`
    pub fn add_edge(&mut self, table: &str, referenced: &str) {
        self.add_table(table);
        self.add_table(referenced);

        let added = self
            .nodes
            .get_mut(table)
            .is_some_and(|deps| deps.add_dependency(referenced));
        if added {
            if let Some(deps) = self.nodes.get_mut(referenced) {
                deps.add_dependent(table);
            }
        }
    }

    pub fn get(&self, table: &str) -> Option<&Dependencies> {
        self.nodes.get(table)
    }

    /// Tables in discovery order
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Order tables with Kahn's algorithm.
    ///
    /// Ready tables are processed first-in first-out in discovery order, so the
    /// result is deterministic for a given schema text. Fails with
    /// [`TabsqlError::CyclicDependency`] when some tables can never become ready.
    pub fn topological_order(&self) -> Result<TableOrder> {
        let mut in_degree: IndexMap<&str, usize> = self
            .nodes
            .iter()
            .map(|(name, deps)| (name.as_str(), deps.depends_on.len()))
            .collect();

        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&name, _)| name)
            .collect();
        let mut sorted: Vec<String> = Vec::with_capacity(self.nodes.len());

        while let Some(current) = queue.pop_front() {
            sorted.push(current.to_string());
            let Some(deps) = self.nodes.get(current) else {
                continue;
            };
            for dependent in &deps.depended_by {
                if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dependent.as_str());
                    }
                }
            }
        }

        if sorted.len() < self.nodes.len() {
            let tables: Vec<String> = in_degree
                .into_iter()
                .filter(|&(_, degree)| degree > 0)
                .map(|(name, _)| name.to_string())
                .collect();
            tracing::error!(tables = ?tables, "cyclic foreign key dependency");
            return Err(TabsqlError::CyclicDependency { tables });
        }

        tracing::debug!(order = ?sorted, "resolved table order");
        Ok(TableOrder(sorted))
    }
}

/// Tables in insertion order: every referenced table precedes its referencing tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableOrder(Vec<String>);

impl TableOrder {
    /// Wrap an order that needs no resolution, e.g. a schema-less run
    pub fn from_names(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn position(&self, table: &str) -> Option<usize> {
        self.0.iter().position(|t| t == table)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a TableOrder {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build the graph for `catalog` and order it
pub fn resolve_table_order(
    catalog: &SchemaCatalog,
    policy: UnknownReferencePolicy,
) -> Result<TableOrder> {
    DependencyGraph::from_catalog(catalog, policy)?.topological_order()
}
