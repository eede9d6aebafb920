//! Integration tests for the reflexion pipeline
//!
//! These exercise the full flow: dependency dump -> filtered diagram text ->
//! parsed graph -> normalized graph -> similarity scores, plus the CLI
//! binary itself.

use reflexion_builder::{BuildOptions, build, serialize};
use reflexion_core::{NormalizeOptions, normalize, structural_tokens, textual_score};
use reflexion_parser::parse;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const HAND_DRAWN: &str = r#"
@startuml
' recovered from the project wiki
component "Podman CLI" as cli
component "Image Builder" as builder
interface "Registry API" as registry
cli --> builder : builds
builder ..> registry
@enduml
"#;

#[test]
fn test_dump_to_scores_pipeline() {
    let dump = "github.com/containers/podman github.com/containers/buildah@v1.30.0\n\
                github.com/containers/podman github.com/containers/storage@v1.50.0\n\
                github.com/containers/buildah golang.org/x/term@v0.1.0\n";
    let options = BuildOptions {
        packages: vec!["github.com/containers".to_string()],
        remove_isolated: true,
        show_version: true,
        ..Default::default()
    };
    let built = build(dump, &options).unwrap();
    let diagram = serialize(&built.graph, false);

    let parsed = parse(&diagram).unwrap();
    assert!(parsed.warnings.is_empty());
    assert_eq!(parsed.graph.node_count(), 3);
    assert_eq!(parsed.graph.edge_count(), 2);

    let generated = normalize(&parsed.graph, &NormalizeOptions::default());
    let hand = normalize(&parse(HAND_DRAWN).unwrap().graph, &NormalizeOptions::default());

    let score = reflexion_core::structural_score(&generated, &hand);
    assert!(score >= 0.0 && score <= 1.0);
    // Different naming conventions on each side: no reconciliation happens.
    assert!(score < 1.0);
}

#[test]
fn test_serialize_parse_round_trip_preserves_structure() {
    let parsed = parse(HAND_DRAWN).unwrap();
    let normalized = normalize(&parsed.graph, &NormalizeOptions::default());

    let reparsed = parse(&serialize(&normalized, false)).unwrap();
    assert_eq!(structural_tokens(&reparsed.graph), structural_tokens(&normalized));
    assert_eq!(reflexion_core::structural_score(&reparsed.graph, &normalized), 1.0);
}

#[test]
fn test_round_trip_preserves_implicit_nodes() {
    // Relation-only endpoints are implicitly created; serializing declares
    // them as components, and the reparse must encode identically.
    let text = "@startuml\ncli --> builder : builds\nbuilder ..> registry\n@enduml\n";
    let parsed = parse(text).unwrap();
    assert!(parsed.warnings.is_empty());
    let normalized = normalize(&parsed.graph, &NormalizeOptions::default());

    let reparsed = parse(&serialize(&normalized, false)).unwrap();
    assert_eq!(structural_tokens(&reparsed.graph), structural_tokens(&normalized));
    assert_eq!(reflexion_core::structural_score(&reparsed.graph, &normalized), 1.0);
}

#[test]
fn test_identical_diagrams_score_one() {
    let graph = normalize(&parse(HAND_DRAWN).unwrap().graph, &NormalizeOptions::default());
    assert_eq!(reflexion_core::structural_score(&graph, &graph), 1.0);
    assert_eq!(textual_score(HAND_DRAWN, HAND_DRAWN), 1.0);
}

#[test]
fn test_renamed_component_scores_between_zero_and_one() {
    let renamed = HAND_DRAWN.replace("builder", "builder2");
    let options = NormalizeOptions::default();
    let a = normalize(&parse(HAND_DRAWN).unwrap().graph, &options);
    let b = normalize(&parse(&renamed).unwrap().graph, &options);

    let score = reflexion_core::structural_score(&a, &b);
    assert!(score > 0.0, "the unrenamed side still matches");
    assert!(score < 1.0, "the renamed component does not");
}

#[test]
fn test_disjoint_diagrams_score_zero() {
    let other = "@startuml\ncomponent \"Scheduler\" as sched\ncomponent \"Queue\" as queue\nsched --> queue\n@enduml\n";
    let options = NormalizeOptions::default();
    let a = normalize(&parse(HAND_DRAWN).unwrap().graph, &options);
    let b = normalize(&parse(other).unwrap().graph, &options);

    assert_eq!(reflexion_core::structural_score(&a, &b), 0.0);
    assert_eq!(textual_score(HAND_DRAWN, other), 0.0);
}

#[test]
fn test_cli_build_and_compare() {
    let dir = TempDir::new().unwrap();
    let dump_path = dir.path().join("modgraph.txt");
    let diagram_path = dir.path().join("generated.puml");
    let hand_path = dir.path().join("hand.puml");

    fs::write(&dump_path, "X@1.0 Y@2.0\nY@2.0 Z@3.0\n").unwrap();
    fs::write(&hand_path, HAND_DRAWN).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_reflexion"))
        .args([
            "build",
            dump_path.to_str().unwrap(),
            diagram_path.to_str().unwrap(),
            "--packages",
            "X,Y",
            "--remove-isolated",
        ])
        .status()
        .unwrap();
    assert!(status.success());

    let diagram = fs::read_to_string(&diagram_path).unwrap();
    assert!(diagram.contains("component \"X\" as x"));
    assert!(!diagram.contains("as z"));

    let output = Command::new(env!("CARGO_BIN_EXE_reflexion"))
        .args([
            "compare",
            diagram_path.to_str().unwrap(),
            hand_path.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("structural score: 0."));
    assert!(stdout.contains("textual score:"));
}

#[test]
fn test_cli_build_fails_on_filtered_empty() {
    let dir = TempDir::new().unwrap();
    let dump_path = dir.path().join("modgraph.txt");
    fs::write(&dump_path, "a b\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_reflexion"))
        .args([
            "build",
            dump_path.to_str().unwrap(),
            dir.path().join("out.puml").to_str().unwrap(),
            "--packages",
            "nomatch",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("removed every module"));
}

#[test]
fn test_cli_compare_visualize_writes_dot() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.puml");
    let second = dir.path().join("second.puml");
    fs::write(&first, HAND_DRAWN).unwrap();
    fs::write(&second, HAND_DRAWN).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_reflexion"))
        .args([
            "compare",
            first.to_str().unwrap(),
            second.to_str().unwrap(),
            "--visualize",
        ])
        .status()
        .unwrap();
    assert!(status.success());

    let dot = fs::read_to_string(dir.path().join("first.dot")).unwrap();
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("\"cli\" -> \"builder\""));
}
