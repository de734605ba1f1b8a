use crate::error::{Result, TaxonomyError};
use crate::types::{Category, Taxonomy};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, VecDeque};

/// Collects parent links and validates them into a [`Taxonomy`]
#[derive(Debug, Default)]
pub struct TaxonomyBuilder {
    /// Declaration order, so the built graph is deterministic
    order: Vec<String>,
    parents: HashMap<String, Option<String>>,
    names: HashMap<String, String>,
}

impl TaxonomyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the root category
    pub fn add_root(&mut self, id: &str) -> Result<()> {
        self.declare(id, None)
    }

    /// Declare `id` as a child of `parent`
    pub fn add_child(&mut self, id: &str, parent: &str) -> Result<()> {
        if id == parent {
            return Err(TaxonomyError::malformed(format!(
                "category {id} is its own parent"
            )));
        }
        self.declare(id, Some(parent))
    }

    /// Declare every link along a root-to-category path
    pub fn add_path<S: AsRef<str>>(&mut self, path: &[S]) -> Result<()> {
        let Some(first) = path.first() else {
            return Err(TaxonomyError::malformed("empty category path"));
        };
        self.add_root(first.as_ref())?;
        for pair in path.windows(2) {
            self.add_child(pair[1].as_ref(), pair[0].as_ref())?;
        }
        Ok(())
    }

    /// Attach a display name; the first name seen wins
    pub fn set_name(&mut self, id: &str, name: &str) {
        self.names
            .entry(id.to_string())
            .or_insert_with(|| name.to_string());
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn declare(&mut self, id: &str, parent: Option<&str>) -> Result<()> {
        match self.parents.get(id) {
            Some(existing) if existing.as_deref() == parent => Ok(()),
            Some(existing) => Err(TaxonomyError::malformed(format!(
                "category {id} has conflicting parents {} and {}",
                existing.as_deref().unwrap_or("<none>"),
                parent.unwrap_or("<none>")
            ))),
            None => {
                self.order.push(id.to_string());
                self.parents
                    .insert(id.to_string(), parent.map(str::to_string));
                Ok(())
            }
        }
    }

    /// Validate the collected links and freeze them into a tree
    pub fn build(mut self) -> Result<Taxonomy> {
        let roots: Vec<&String> = self
            .order
            .iter()
            .filter(|id| matches!(self.parents.get(*id), Some(None)))
            .collect();
        let root_id = match roots.as_slice() {
            [] => return Err(TaxonomyError::malformed("no root category")),
            [root] => (*root).clone(),
            many => {
                let ids: Vec<&str> = many.iter().map(|s| s.as_str()).collect();
                return Err(TaxonomyError::malformed(format!(
                    "multiple root categories: {}",
                    ids.join(", ")
                )));
            }
        };

        let mut graph: DiGraph<Category, ()> = DiGraph::with_capacity(self.order.len(), self.order.len());
        let mut index: HashMap<String, NodeIndex> = HashMap::with_capacity(self.order.len());

        for id in &self.order {
            let parent = self.parents.get(id).cloned().flatten();
            let category = Category {
                id: id.clone(),
                name: self.names.remove(id),
                parent,
                depth: 0,
            };
            let idx = graph.add_node(category);
            index.insert(id.clone(), idx);
        }

        for id in &self.order {
            let Some(parent) = self.parents.get(id).and_then(|p| p.as_deref()) else {
                continue;
            };
            let parent_idx = index.get(parent).copied().ok_or_else(|| {
                TaxonomyError::malformed(format!(
                    "category {id} references undeclared parent {parent}"
                ))
            })?;
            graph.add_edge(parent_idx, index[id], ());
        }

        if let Err(cycle) = toposort(&graph, None) {
            return Err(TaxonomyError::malformed(format!(
                "cycle through category {}",
                graph[cycle.node_id()].id
            )));
        }

        let root = index[&root_id];
        let max_depth = assign_depths(&mut graph, root)?;

        log::info!(
            "Built taxonomy: {} categories, root {}, max depth {}",
            graph.node_count(),
            root_id,
            max_depth
        );

        Ok(Taxonomy {
            graph,
            index,
            root,
            max_depth,
        })
    }
}

/// Breadth-first depth assignment from the root; returns the deepest level
fn assign_depths(graph: &mut DiGraph<Category, ()>, root: NodeIndex) -> Result<usize> {
    let mut visited = vec![false; graph.node_count()];
    let mut queue = VecDeque::from([(root, 0usize)]);
    let mut max_depth = 0;

    while let Some((node, depth)) = queue.pop_front() {
        visited[node.index()] = true;
        graph[node].depth = depth;
        max_depth = max_depth.max(depth);

        let children: Vec<NodeIndex> = graph.neighbors_directed(node, Direction::Outgoing).collect();
        for child in children {
            queue.push_back((child, depth + 1));
        }
    }

    if let Some(orphan) = visited.iter().position(|seen| !seen) {
        return Err(TaxonomyError::malformed(format!(
            "category {} is not reachable from the root",
            graph[NodeIndex::new(orphan)].id
        )));
    }

    Ok(max_depth)
}
