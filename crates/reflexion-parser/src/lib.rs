//! Reflexion Parser — turns diagram DSL text into a diagram graph
//!
//! Parsing is line-oriented and best-effort: individually malformed lines
//! are skipped with a recorded warning, and only structural breakage
//! (unbalanced namespace blocks) is fatal, so a graph is always produced
//! for well-nested input.

pub mod grammar;

#[cfg(test)]
pub mod tests;

use grammar::Line;
use reflexion_core::{DiagramEdge, DiagramNode, Graph, NodeKind, canonical_id, namespaced_id};
use serde::{Deserialize, Serialize};

/// Unrecoverable structural breakage in a diagram.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("block '{name}' opened at line {line} is never closed")]
    UnterminatedBlock { name: String, line: usize },
    #[error("unmatched closing brace at line {line}")]
    UnbalancedClose { line: usize },
}

/// A skipped line, kept for reporting alongside the best-effort graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseWarning {
    pub line: usize,
    pub text: String,
}

/// Result of a successful parse.
#[derive(Debug)]
pub struct Parsed {
    pub graph: Graph,
    pub warnings: Vec<ParseWarning>,
}

struct ParserState {
    graph: Graph,
    warnings: Vec<ParseWarning>,
    /// Enclosing namespace names with the line each block opened on.
    stack: Vec<(String, usize)>,
    /// Inside a `note ... end note` block.
    in_note: bool,
}

/// Parse diagram DSL text into a graph.
pub fn parse(text: &str) -> Result<Parsed, ParseError> {
    let mut state = ParserState {
        graph: Graph::new(),
        warnings: Vec::new(),
        stack: Vec::new(),
        in_note: false,
    };

    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        if raw.trim().is_empty() {
            continue;
        }
        if state.in_note {
            if matches!(grammar::classify(raw), Line::NoteEnd) {
                state.in_note = false;
            }
            continue;
        }
        match grammar::classify(raw) {
            Line::Marker | Line::Comment | Line::Directive | Line::Note => {}
            Line::NoteOpen => state.in_note = true,
            Line::NoteEnd => {
                // `end note` without an opening block is just noise.
                warn(&mut state, number, raw, "stray 'end note'");
            }
            Line::BlockOpen { name } => state.stack.push((name, number)),
            Line::BlockClose => {
                if state.stack.pop().is_none() {
                    return Err(ParseError::UnbalancedClose { line: number });
                }
            }
            Line::Declaration { kind, label, alias } => declare(&mut state, kind, label, alias),
            Line::Relation {
                source,
                target,
                style,
                inline_label,
                trailing_label,
            } => {
                let source_id = resolve(&mut state, &source);
                let target_id = resolve(&mut state, &target);
                let edge = DiagramEdge {
                    source: source_id,
                    target: target_id,
                    label: trailing_label.or(inline_label),
                    style,
                    version: None,
                };
                if state.graph.add_edge(edge).is_err() {
                    warn(&mut state, number, raw, "relation endpoint missing");
                }
            }
            Line::Unrecognized => warn(&mut state, number, raw, "unrecognized line"),
        }
    }

    if let Some((name, line)) = state.stack.pop() {
        return Err(ParseError::UnterminatedBlock { name, line });
    }

    Ok(Parsed {
        graph: state.graph,
        warnings: state.warnings,
    })
}

fn warn(state: &mut ParserState, line: usize, raw: &str, reason: &str) {
    tracing::warn!("line {}: {} ({})", line, reason, raw.trim());
    state.warnings.push(ParseWarning {
        line,
        text: raw.trim().to_string(),
    });
}

fn declare(state: &mut ParserState, kind: NodeKind, label: String, alias: Option<String>) {
    let namespace: Vec<String> = state.stack.iter().map(|(name, _)| name.clone()).collect();
    // An explicit alias is the canonical id; otherwise the display label is
    // canonicalized and joined with the enclosing namespace path.
    let id = match alias {
        Some(alias) => alias,
        None => namespaced_id(&namespace, &label),
    };
    state.graph.add_node(DiagramNode {
        id,
        label,
        kind,
        namespace,
        version: None,
    });
}

/// Map a relation endpoint token to a node id, creating an implicit node of
/// kind Unknown when the token was never declared.
fn resolve(state: &mut ParserState, token: &str) -> String {
    if state.graph.contains(token) {
        return token.to_string();
    }
    let namespace: Vec<String> = state.stack.iter().map(|(name, _)| name.clone()).collect();
    let scoped = namespaced_id(&namespace, token);
    if state.graph.contains(&scoped) {
        return scoped;
    }
    let bare = canonical_id(token);
    if state.graph.contains(&bare) {
        return bare;
    }
    state.graph.add_node(DiagramNode {
        id: bare.clone(),
        label: token.to_string(),
        kind: NodeKind::Unknown,
        namespace: Vec::new(),
        version: None,
    });
    bare
}
