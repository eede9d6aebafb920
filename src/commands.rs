//! CLI command implementations; owns all file I/O

use anyhow::Context;
use reflexion_builder::BuildOptions;
use reflexion_core::{Graph, NormalizeOptions, normalize, score};
use std::fs;
use std::path::{Path, PathBuf};

pub fn build(input: &Path, output: &Path, options: &BuildOptions) -> anyhow::Result<()> {
    let dump = fs::read_to_string(input)
        .with_context(|| format!("cannot read dependency dump {}", input.display()))?;

    let built = reflexion_builder::build(&dump, options)
        .with_context(|| format!("cannot build a diagram from {}", input.display()))?;
    for warning in &built.warnings {
        tracing::warn!("skipped dump line {}: {}", warning.line, warning.text);
    }
    tracing::info!(
        "built {} modules, {} dependencies",
        built.graph.node_count(),
        built.graph.edge_count()
    );

    let text = reflexion_builder::serialize(&built.graph, options.show_version);
    fs::write(output, text)
        .with_context(|| format!("cannot write diagram {}", output.display()))?;
    tracing::info!("diagram saved to {}", output.display());
    Ok(())
}

pub fn compare(first: &Path, second: &Path, visualize: bool, json: bool) -> anyhow::Result<()> {
    let (text_a, graph_a) = load_diagram(first)?;
    let (text_b, graph_b) = load_diagram(second)?;

    let options = NormalizeOptions::default();
    let normalized_a = normalize(&graph_a, &options);
    let normalized_b = normalize(&graph_b, &options);

    let report = score::compare(&normalized_a, &normalized_b, &text_a, &text_b);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("structural score: {:.4}", report.structural);
        println!("textual score:    {:.4}", report.textual);
    }

    if visualize {
        write_dot(&normalized_a, &dot_path(first))?;
        write_dot(&normalized_b, &dot_path(second))?;
    }

    Ok(())
}

/// Read and parse one diagram. A diagram that parses to zero nodes is
/// reported as an error rather than silently compared as empty.
fn load_diagram(path: &Path) -> anyhow::Result<(String, Graph)> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read diagram {}", path.display()))?;
    let parsed = reflexion_parser::parse(&text)
        .with_context(|| format!("cannot parse diagram {}", path.display()))?;
    for warning in &parsed.warnings {
        tracing::warn!(
            "{}: skipped line {}: {}",
            path.display(),
            warning.line,
            warning.text
        );
    }
    if parsed.graph.node_count() == 0 {
        anyhow::bail!("diagram {} contains no nodes", path.display());
    }
    Ok((text, parsed.graph))
}

fn dot_path(input: &Path) -> PathBuf {
    input.with_extension("dot")
}

/// Write a normalized graph as Graphviz DOT for manual visual verification.
/// Rendering the file is left to external tooling.
fn write_dot(graph: &Graph, path: &Path) -> anyhow::Result<()> {
    let mut lines = vec!["digraph architecture {".to_string()];
    lines.push("  rankdir=LR;".to_string());
    for id in graph.sorted_ids() {
        let node = graph.node(&id).expect("id from sorted_ids");
        lines.push(format!("  \"{}\" [label=\"{}\"];", node.id, node.label));
    }
    for edge in graph.sorted_edges() {
        let label = match &edge.label {
            Some(label) => format!(" [label=\"{}\"]", label),
            None => String::new(),
        };
        lines.push(format!("  \"{}\" -> \"{}\"{};", edge.source, edge.target, label));
    }
    lines.push("}".to_string());
    fs::write(path, lines.join("\n"))
        .with_context(|| format!("cannot write {}", path.display()))?;
    tracing::info!("normalized graph written to {}", path.display());
    Ok(())
}
