//! Diagram DSL writer
//!
//! Re-serializes a graph into the diagram DSL so the parser can consume it
//! again. Output is deterministic: declarations sorted by id, relations
//! sorted by (source, target, label, style).

use reflexion_core::Graph;

/// Length at which version strings on edges are cut off.
const VERSION_WIDTH: usize = 10;

/// Serialize a graph into diagram DSL text.
///
/// When `show_version` is set, edges carrying a version string are annotated
/// with it after a colon, the way the original dump recorded the consumer's
/// version.
pub fn serialize(graph: &Graph, show_version: bool) -> String {
    let mut lines = vec![
        "@startuml".to_string(),
        "skinparam componentStyle rectangle".to_string(),
        "left to right direction".to_string(),
        "title Generated Architecture".to_string(),
        "legend \"Naming scheme: Organisation | Project\"".to_string(),
        String::new(),
    ];

    for id in graph.sorted_ids() {
        let node = graph.node(&id).expect("id from sorted_ids");
        lines.push(format!("{} \"{}\" as {}", node.kind.keyword(), node.label, node.id));
    }

    lines.push(String::new());

    for edge in graph.sorted_edges() {
        let annotation = match (&edge.label, &edge.version) {
            (Some(label), _) => format!(" : {}", label),
            (None, Some(version)) if show_version => {
                format!(" : {}", truncate(version, VERSION_WIDTH))
            }
            _ => String::new(),
        };
        lines.push(format!(
            "{} {} {}{}",
            edge.source,
            edge.style.arrow(),
            edge.target,
            annotation
        ));
    }

    lines.push(String::new());
    lines.push("@enduml".to_string());
    lines.join("\n")
}

fn truncate(text: &str, width: usize) -> &str {
    match text.char_indices().nth(width) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}
