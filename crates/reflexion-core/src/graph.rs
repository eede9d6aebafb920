//! Graph wrapper using petgraph::StableDiGraph with id-keyed lookup

use crate::model::{DiagramEdge, DiagramNode};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use std::collections::HashMap;

/// Errors raised by graph construction.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GraphError {
    /// An edge referenced a node id that is not present in the graph.
    #[error("edge endpoint '{0}' does not exist in the graph")]
    MissingEndpoint(String),
}

/// A diagram graph — a directed multigraph keyed by canonical node id.
///
/// Parallel edges between the same ordered pair are permitted as long as
/// their label or style differs.
#[derive(Clone, Default)]
pub struct Graph {
    inner: StableDiGraph<DiagramNode, DiagramEdge>,
    ids: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            inner: StableDiGraph::new(),
            ids: HashMap::new(),
        }
    }

    /// Add a node. If a node with the same id already exists the graph is
    /// unchanged and the existing node is kept; node ids are unique.
    pub fn add_node(&mut self, node: DiagramNode) {
        if self.ids.contains_key(&node.id) {
            return;
        }
        let id = node.id.clone();
        let idx = self.inner.add_node(node);
        self.ids.insert(id, idx);
    }

    /// Add an edge. Both endpoints must already exist.
    pub fn add_edge(&mut self, edge: DiagramEdge) -> Result<(), GraphError> {
        let source = *self
            .ids
            .get(&edge.source)
            .ok_or_else(|| GraphError::MissingEndpoint(edge.source.clone()))?;
        let target = *self
            .ids
            .get(&edge.target)
            .ok_or_else(|| GraphError::MissingEndpoint(edge.target.clone()))?;
        self.inner.add_edge(source, target, edge);
        Ok(())
    }

    /// Get a node by canonical id.
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.ids.get(id).and_then(|idx| self.inner.node_weight(*idx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all nodes, in arbitrary order.
    pub fn nodes(&self) -> impl Iterator<Item = &DiagramNode> {
        self.inner.node_weights()
    }

    /// Iterate over all edges, in arbitrary order.
    pub fn edges(&self) -> impl Iterator<Item = &DiagramEdge> {
        self.inner.edge_weights()
    }

    /// Total degree (in + out) of a node; 0 for unknown ids.
    pub fn degree(&self, id: &str) -> usize {
        match self.ids.get(id) {
            Some(&idx) => {
                self.inner.edges_directed(idx, Direction::Outgoing).count()
                    + self.inner.edges_directed(idx, Direction::Incoming).count()
            }
            None => 0,
        }
    }

    /// In-degree of a node; 0 for unknown ids.
    pub fn in_degree(&self, id: &str) -> usize {
        match self.ids.get(id) {
            Some(&idx) => self.inner.edges_directed(idx, Direction::Incoming).count(),
            None => 0,
        }
    }

    /// Ids of direct successors of a node.
    pub fn successors(&self, id: &str) -> Vec<String> {
        match self.ids.get(id) {
            Some(&idx) => self
                .inner
                .neighbors_directed(idx, Direction::Outgoing)
                .filter_map(|n| self.inner.node_weight(n))
                .map(|n| n.id.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Remove a node and all incident edges.
    pub fn remove_node(&mut self, id: &str) -> Option<DiagramNode> {
        let idx = self.ids.remove(id)?;
        self.inner.remove_node(idx)
    }

    /// Drop every node with total degree zero. Returns how many were removed.
    pub fn remove_isolated(&mut self) -> usize {
        let isolated: Vec<String> = self
            .nodes()
            .filter(|n| self.degree(&n.id) == 0)
            .map(|n| n.id.clone())
            .collect();
        for id in &isolated {
            self.remove_node(id);
        }
        isolated.len()
    }

    /// Keep only nodes satisfying the predicate; incident edges of removed
    /// nodes are dropped with them.
    pub fn retain_nodes<F>(&mut self, mut keep: F)
    where
        F: FnMut(&DiagramNode) -> bool,
    {
        let doomed: Vec<String> = self
            .nodes()
            .filter(|n| !keep(n))
            .map(|n| n.id.clone())
            .collect();
        for id in &doomed {
            self.remove_node(id);
        }
    }

    /// Node ids in lexicographic order, for deterministic serialization.
    pub fn sorted_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Edges sorted by (source, target, label, style), for deterministic
    /// serialization and token encoding.
    pub fn sorted_edges(&self) -> Vec<&DiagramEdge> {
        let mut edges: Vec<&DiagramEdge> = self.edges().collect();
        edges.sort_by(|a, b| {
            (&a.source, &a.target, &a.label, a.style.as_str())
                .cmp(&(&b.source, &b.target, &b.label, b.style.as_str()))
        });
        edges
    }
}
