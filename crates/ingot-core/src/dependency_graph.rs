//! Header dependency graph and cycle-detecting topological sort

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::source_file::SourceFile;

/// Directed graph over header base names.
///
/// Nodes and edges are kept in B-tree collections so the sort visits them in
/// the same order on every host, which makes the final ordering reproducible
/// even between mutually independent subtrees.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Adjacency list: header name -> names of headers it depends on.
    dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from the header record set. Only headers become
    /// nodes; source files are leaves appended after the header block and
    /// never participate in ordering.
    pub fn from_headers(headers: &[SourceFile]) -> Self {
        let mut graph = Self::new();
        for header in headers {
            graph.add_node(header.file_name.clone());
            for dependency in &header.local_includes {
                graph.add_dependency(header.file_name.clone(), dependency.clone());
            }
        }
        graph
    }

    /// Add a node with no edges (or keep its existing edges).
    pub fn add_node(&mut self, node: String) {
        self.dependencies.entry(node).or_default();
    }

    /// Add a dependency edge: `from` depends on `to`. The target is not
    /// forced into the node set; edges may point at names outside the graph.
    pub fn add_dependency(&mut self, from: String, to: String) {
        self.dependencies.entry(from).or_default().insert(to);
    }

    /// Direct dependencies of a node, if it is a graph key.
    pub fn dependencies_of(&self, node: &str) -> Option<&BTreeSet<String>> {
        self.dependencies.get(node)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Topologically sort the graph: every name appears strictly after the
    /// names it depends on.
    ///
    /// Depth-first search with three node states: unvisited, in-progress
    /// (on the active path), finished. Reaching an in-progress node means
    /// the active path closed a cycle, which is unorderable and fatal.
    /// Edges to names that are not graph keys are excluded from the
    /// ordering with a warning; the result contains exactly the graph keys.
    pub fn topological_sort(&self) -> Result<Vec<String>, CycleError> {
        let mut finished: BTreeSet<&str> = BTreeSet::new();
        let mut on_path: Vec<&str> = Vec::new();
        let mut order = Vec::with_capacity(self.dependencies.len());

        for node in self.dependencies.keys() {
            if !finished.contains(node.as_str()) {
                self.visit(node, &mut finished, &mut on_path, &mut order)?;
            }
        }
        Ok(order)
    }

    fn visit<'a>(
        &'a self,
        node: &'a str,
        finished: &mut BTreeSet<&'a str>,
        on_path: &mut Vec<&'a str>,
        order: &mut Vec<String>,
    ) -> Result<(), CycleError> {
        on_path.push(node);

        if let Some(dependencies) = self.dependencies.get(node) {
            for dependency in dependencies {
                if let Some(start) = on_path.iter().position(|name| name == dependency) {
                    let mut cycle: Vec<String> =
                        on_path[start..].iter().map(|name| name.to_string()).collect();
                    cycle.push(dependency.clone());
                    return Err(CycleError::new(cycle));
                }
                if finished.contains(dependency.as_str()) {
                    continue;
                }
                if self.dependencies.contains_key(dependency) {
                    self.visit(dependency, finished, on_path, order)?;
                } else {
                    // The header lives outside the scanned roots (or the
                    // include names a non-header file). It cannot be placed,
                    // so it is left out of the ordering.
                    warn!(
                        name = %dependency,
                        "local include does not match any scanned header, excluded from ordering"
                    );
                    finished.insert(dependency);
                }
            }
        }

        on_path.pop();
        finished.insert(node);
        order.push(node.to_string());
        Ok(())
    }
}

/// A cyclic local-header dependency; no valid ordering exists.
#[derive(Debug)]
pub struct CycleError {
    /// The offending path, first node repeated at the end.
    pub cycle: Vec<String>,
}

impl CycleError {
    pub fn new(cycle: Vec<String>) -> Self {
        Self { cycle }
    }
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Dependency cycle detected: ")?;
        for (i, name) in self.cycle.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{name}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CycleError {}
