//! Graph normalization so independently authored diagrams become comparable

use crate::graph::Graph;
use crate::model::{DiagramEdge, DiagramNode, NodeKind, canonical_id};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Toggles for the individual canonicalization steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Map every node id through [`canonical_id`].
    pub canonical_ids: bool,
    /// Namespace-path prefixes (`/`-separated) whose members are merged into
    /// a single synthetic grouping node.
    pub collapse: Vec<String>,
    /// Drop nodes with total degree zero after the other steps.
    pub prune_isolated: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeOptions {
            canonical_ids: true,
            collapse: Vec::new(),
            prune_isolated: false,
        }
    }
}

/// Produce a normalized copy of `graph`. The input is never mutated.
pub fn normalize(graph: &Graph, options: &NormalizeOptions) -> Graph {
    let collapse: Vec<Vec<String>> = options
        .collapse
        .iter()
        .map(|prefix| prefix.split('/').map(str::to_string).collect())
        .filter(|parts: &Vec<String>| !parts.is_empty())
        .collect();

    // Pass 1: decide the final id of every node and collect the node set.
    let mut rename: HashMap<String, String> = HashMap::new();
    let mut out = Graph::new();
    for node in graph.nodes() {
        if let Some(prefix) = collapse.iter().find(|p| starts_with_path(&node.namespace, p)) {
            let group_name = prefix.last().expect("non-empty prefix");
            let group_id = canonical_id(group_name);
            rename.insert(node.id.clone(), group_id.clone());
            out.add_node(DiagramNode {
                id: group_id,
                label: group_name.clone(),
                kind: NodeKind::Package,
                namespace: prefix[..prefix.len() - 1].to_vec(),
                version: None,
            });
            continue;
        }

        let new_id = if options.canonical_ids {
            canonical_id(&node.id)
        } else {
            node.id.clone()
        };
        rename.insert(node.id.clone(), new_id.clone());
        let mut copy = node.clone();
        copy.id = new_id;
        out.add_node(copy);
    }

    // Pass 2: rewrite edges onto the surviving ids. Edges made identical by
    // collapsing are deduplicated by (source, target, label); self-loops
    // produced by merging a whole subtree into one box are dropped.
    let mut seen: HashSet<(String, String, Option<String>)> = HashSet::new();
    for edge in graph.edges() {
        let source = rename[&edge.source].clone();
        let target = rename[&edge.target].clone();
        if source == target {
            continue;
        }
        if !seen.insert((source.clone(), target.clone(), edge.label.clone())) {
            continue;
        }
        let rewritten = DiagramEdge {
            source,
            target,
            label: edge.label.clone(),
            style: edge.style,
            version: edge.version.clone(),
        };
        // Endpoints are guaranteed present: both ids came out of pass 1.
        let _ = out.add_edge(rewritten);
    }

    if options.prune_isolated {
        let removed = out.remove_isolated();
        if removed > 0 {
            tracing::debug!("pruned {} isolated nodes", removed);
        }
    }

    out
}

fn starts_with_path(namespace: &[String], prefix: &[String]) -> bool {
    namespace.len() >= prefix.len() && namespace[..prefix.len()] == *prefix
}
