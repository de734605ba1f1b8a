use crate::error::{Result, TaxonomyError};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category in the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier (e.g., "abcat0100000")
    pub id: String,

    /// Human-readable name, when the source provides one
    pub name: Option<String>,

    /// Parent id (None only for the root)
    pub parent: Option<String>,

    /// Path length from the root (root = 0)
    pub depth: usize,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Immutable category tree.
///
/// Categories are allocated once into the graph arena and referenced by id
/// through `index`; edges point from parent to child.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub(crate) graph: DiGraph<Category, ()>,
    pub(crate) index: HashMap<String, NodeIndex>,
    pub(crate) root: NodeIndex,
    pub(crate) max_depth: usize,
}

impl Taxonomy {
    /// Parent of a category.
    ///
    /// Fails with `UnknownCategory` for ids outside the tree and with
    /// `RootRollupAttempted` for the root.
    pub fn parent_of(&self, id: &str) -> Result<&str> {
        let category = self.get(id).ok_or_else(|| TaxonomyError::unknown(id))?;
        category
            .parent
            .as_deref()
            .ok_or_else(|| TaxonomyError::RootRollupAttempted(id.to_string()))
    }

    /// Longest root-to-category path length, in edges
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Find category by id
    pub fn get(&self, id: &str) -> Option<&Category> {
        self.index
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn is_root(&self, id: &str) -> bool {
        self.index.get(id) == Some(&self.root)
    }

    /// True for ids that may appear as an emitted label: known and not the root
    pub fn is_labelable(&self, id: &str) -> bool {
        self.contains(id) && !self.is_root(id)
    }

    pub fn depth(&self, id: &str) -> Option<usize> {
        self.get(id).map(|c| c.depth)
    }

    pub fn root(&self) -> &Category {
        &self.graph[self.root]
    }

    /// Ancestors of a category, nearest first, ending with the root
    pub fn ancestors<'a>(&'a self, id: &str) -> Ancestors<'a> {
        let next = self.get(id).and_then(|c| c.parent.as_deref());
        Ancestors {
            taxonomy: self,
            next,
        }
    }

    /// Direct children, sorted by id
    pub fn children(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut children: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|child| self.graph[child].id.as_str())
            .collect();
        children.sort_unstable();
        children
    }

    /// All categories, in declaration order
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.graph.node_weights()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

/// Iterator over the parent chain of a category
pub struct Ancestors<'a> {
    taxonomy: &'a Taxonomy,
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self
            .taxonomy
            .get(current)
            .and_then(|c| c.parent.as_deref());
        Some(current)
    }
}
