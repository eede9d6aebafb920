//! Unit tests for the diagram DSL parser

use crate::{ParseError, parse};
use reflexion_core::{EdgeStyle, NodeKind};

#[test]
fn test_parse_declarations_and_relation() {
    let text = r#"
@startuml
component "Image Builder" as builder
interface "Registry API" as registry
builder --> registry : pushes
@enduml
"#;
    let parsed = parse(text).unwrap();
    assert!(parsed.warnings.is_empty());
    assert_eq!(parsed.graph.node_count(), 2);
    assert_eq!(parsed.graph.edge_count(), 1);

    let builder = parsed.graph.node("builder").unwrap();
    assert_eq!(builder.kind, NodeKind::Component);
    assert_eq!(builder.label, "Image Builder");

    let edge = parsed.graph.edges().next().unwrap();
    assert_eq!(edge.source, "builder");
    assert_eq!(edge.target, "registry");
    assert_eq!(edge.label.as_deref(), Some("pushes"));
    assert_eq!(edge.style, EdgeStyle::SolidAssociation);
}

#[test]
fn test_label_canonicalized_without_alias() {
    let parsed = parse("component \"Dep-Resolver\"\n").unwrap();
    assert!(parsed.graph.contains("dep_resolver"));
}

#[test]
fn test_namespace_blocks() {
    let text = r#"
package core {
  component "Parser"
  component "Lexer"
  Parser --> Lexer
}
"#;
    let parsed = parse(text).unwrap();
    assert!(parsed.warnings.is_empty());
    let node = parsed.graph.node("core_parser").unwrap();
    assert_eq!(node.namespace, vec!["core".to_string()]);

    // The relation inside the block resolved to the namespaced ids.
    let edge = parsed.graph.edges().next().unwrap();
    assert_eq!(edge.source, "core_parser");
    assert_eq!(edge.target, "core_lexer");
}

#[test]
fn test_arrow_styles() {
    let text = "a --> b\nc ..> d\ne *--> f\ng --|> h\n";
    let parsed = parse(text).unwrap();
    let styles: Vec<EdgeStyle> = parsed.graph.sorted_edges().iter().map(|e| e.style).collect();
    assert_eq!(
        styles,
        vec![
            EdgeStyle::SolidAssociation,
            EdgeStyle::DashedDependency,
            EdgeStyle::Composition,
            EdgeStyle::Inheritance,
        ]
    );
}

#[test]
fn test_inline_label_and_precedence() {
    let parsed = parse("A \"builds\" --> B\n").unwrap();
    let edge = parsed.graph.edges().next().unwrap();
    assert_eq!(edge.label.as_deref(), Some("builds"));

    // Post-colon label wins when both are present.
    let parsed = parse("A \"builds\" --> B : overrides\n").unwrap();
    let edge = parsed.graph.edges().next().unwrap();
    assert_eq!(edge.label.as_deref(), Some("overrides"));
}

#[test]
fn test_implicit_nodes() {
    let parsed = parse("Ghost --> Phantom\n").unwrap();
    assert!(parsed.warnings.is_empty());
    let ghost = parsed.graph.node("ghost").unwrap();
    assert_eq!(ghost.kind, NodeKind::Unknown);
    assert!(ghost.namespace.is_empty());
}

#[test]
fn test_comments_directives_and_notes_discarded() {
    let text = r#"
@startuml
' hand-drawn from the wiki page
skinparam componentStyle rectangle
title Recovered Architecture
left to right direction
component A
note over A
  this block is ignored
end note
note left of A : inline remark
A --> B
@enduml
"#;
    let parsed = parse(text).unwrap();
    assert!(parsed.warnings.is_empty());
    assert_eq!(parsed.graph.node_count(), 2);
    assert_eq!(parsed.graph.edge_count(), 1);
}

#[test]
fn test_malformed_line_warns_but_continues() {
    let text = "component A\n<<<not a thing>>>\nA --> B\n";
    let parsed = parse(text).unwrap();
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(parsed.warnings[0].line, 2);
    assert_eq!(parsed.graph.edge_count(), 1);
}

#[test]
fn test_unterminated_block_is_fatal() {
    let err = parse("package core {\ncomponent A\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnterminatedBlock {
            name: "core".to_string(),
            line: 1
        }
    );
}

#[test]
fn test_unbalanced_close_is_fatal() {
    let err = parse("component A\n}\n").unwrap_err();
    assert_eq!(err, ParseError::UnbalancedClose { line: 2 });
}

#[test]
fn test_package_declaration_without_block() {
    let parsed = parse("package \"User Interface\" as ui\n").unwrap();
    let node = parsed.graph.node("ui").unwrap();
    assert_eq!(node.kind, NodeKind::Package);
}

#[test]
fn test_duplicate_declaration_keeps_first() {
    let parsed = parse("component \"First\" as x\ninterface \"Second\" as x\n").unwrap();
    assert_eq!(parsed.graph.node_count(), 1);
    assert_eq!(parsed.graph.node("x").unwrap().label, "First");
}
