//! Dependency-dump parsing and graph filtering
//!
//! A dump is one "producer consumer" identifier pair per line, as emitted by
//! module-dependency tools, with an optional `@version` suffix on either
//! identifier.

use crate::{BuildError, BuildOptions, Built, DumpWarning};
use reflexion_core::{DiagramEdge, DiagramNode, EdgeStyle, Graph, NodeKind, canonical_id};
use std::collections::{HashMap, HashSet, VecDeque};

/// Build a filtered dependency graph from dump text.
pub fn build(dump: &str, options: &BuildOptions) -> Result<Built, BuildError> {
    let mut graph = Graph::new();
    let mut warnings = Vec::new();
    let mut parsed_any = false;

    for (index, raw) in dump.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let (producer, consumer) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(producer), Some(consumer), None) => (producer, consumer),
            _ => {
                tracing::warn!("line {}: expected two identifiers ({})", index + 1, line);
                warnings.push(DumpWarning {
                    line: index + 1,
                    text: line.to_string(),
                });
                continue;
            }
        };
        parsed_any = true;

        let (producer_id, _) = add_module(&mut graph, producer);
        let (consumer_id, consumer_version) = add_module(&mut graph, consumer);

        let edge = DiagramEdge {
            source: producer_id,
            target: consumer_id,
            label: None,
            style: EdgeStyle::SolidAssociation,
            version: consumer_version,
        };
        // Self-loops appear when two versions of one module depend on each
        // other; they carry no architectural signal.
        if edge.source == edge.target {
            continue;
        }
        graph.add_edge(edge).expect("endpoints were just added");
    }

    if !parsed_any {
        return Err(BuildError::EmptyDump);
    }

    apply_package_filter(&mut graph, options);
    if graph.node_count() == 0 {
        return Err(BuildError::FilteredEmpty {
            packages: options.packages.clone(),
            hide_packages: options.hide_packages.clone(),
        });
    }

    // The depth restriction always keeps the depth-0 roots, so it can never
    // empty the graph on its own.
    if let Some(depth) = options.max_depth {
        restrict_to_depth(&mut graph, depth);
    }

    if options.remove_isolated {
        let removed = graph.remove_isolated();
        if removed > 0 {
            tracing::debug!("removed {} isolated modules", removed);
        }
        if graph.node_count() == 0 {
            return Err(BuildError::AllIsolated);
        }
    }

    dedup_edges(&mut graph, options.show_version);
    Ok(Built { graph, warnings })
}

/// Split `name@version`, insert the module node if new, and return its
/// canonical id plus the version.
fn add_module(graph: &mut Graph, token: &str) -> (String, Option<String>) {
    let (name, version) = match token.split_once('@') {
        Some((name, version)) => (name, Some(version.to_string())),
        None => (token, None),
    };
    let id = canonical_id(name);
    if !graph.contains(&id) {
        graph.add_node(DiagramNode {
            id: id.clone(),
            label: simplify_label(name),
            kind: NodeKind::Component,
            namespace: Vec::new(),
            version: version.clone(),
        });
    }
    (id, version)
}

/// Human-readable module label: strip a leading `github.com/`, strip the
/// version suffix, and separate organisation and project with " | ".
pub fn simplify_label(module: &str) -> String {
    let name = module.strip_prefix("github.com/").unwrap_or(module);
    let name = name.split('@').next().unwrap_or(name);
    let name = name.trim_matches('/');
    match name.split_once('/') {
        Some((organisation, project)) => format!("{} | {}", organisation, project),
        None => name.to_string(),
    }
}

fn apply_package_filter(graph: &mut Graph, options: &BuildOptions) {
    let allow: Vec<String> = options
        .packages
        .iter()
        .filter(|p| *p != "*")
        .map(|p| canonical_id(p))
        .collect();
    let allow_all = options.packages.is_empty() || options.packages.iter().any(|p| p == "*");
    let hide: Vec<String> = options.hide_packages.iter().map(|p| canonical_id(p)).collect();

    graph.retain_nodes(|node| {
        let allowed = allow_all || allow.iter().any(|p| node.id.starts_with(p.as_str()));
        let hidden = hide.iter().any(|p| node.id.starts_with(p.as_str()));
        allowed && !hidden
    });
}

/// Keep only nodes within `max_depth` BFS steps of a root. Roots are nodes
/// with no incoming edges; if the filtered graph is cyclic enough to have
/// none, every node counts as a root.
fn restrict_to_depth(graph: &mut Graph, max_depth: u32) {
    let mut roots: Vec<String> = graph
        .nodes()
        .filter(|n| graph.in_degree(&n.id) == 0)
        .map(|n| n.id.clone())
        .collect();
    if roots.is_empty() {
        roots = graph.nodes().map(|n| n.id.clone()).collect();
    }

    let mut depths: HashMap<String, u32> = HashMap::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    for root in roots {
        depths.insert(root.clone(), 0);
        queue.push_back(root);
    }
    while let Some(id) = queue.pop_front() {
        let next = depths[&id] + 1;
        for successor in graph.successors(&id) {
            if depths.get(&successor).is_none_or(|&d| next < d) {
                depths.insert(successor.clone(), next);
                queue.push_back(successor);
            }
        }
    }

    graph.retain_nodes(|node| depths.get(&node.id).is_some_and(|&d| d <= max_depth));
}

/// Drop edges that would render as identical diagram lines. Several
/// versioned dump lines collapse onto the same module pair; the version only
/// keeps them distinct when it will actually be shown.
fn dedup_edges(graph: &mut Graph, show_version: bool) {
    let mut seen: HashSet<(String, String, Option<String>)> = HashSet::new();
    let mut deduped = Graph::new();
    for node in graph.nodes() {
        deduped.add_node(node.clone());
    }
    for edge in graph.sorted_edges() {
        let rendered_version = if show_version { edge.version.clone() } else { None };
        if seen.insert((edge.source.clone(), edge.target.clone(), rendered_version)) {
            deduped.add_edge(edge.clone()).expect("nodes copied above");
        }
    }
    *graph = deduped;
}
