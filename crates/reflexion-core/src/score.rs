//! Similarity scoring between diagrams
//!
//! Two independent strategies, both based on the same matching-ratio
//! algorithm: a structural score over canonical token sequences of two
//! normalized graphs, and a textual score over the preprocessed raw lines
//! of two diagram texts. Neither attempts to reconcile entity names — two
//! semantically identical graphs using different id spellings score low,
//! which is a documented limitation of the approach.

use crate::graph::Graph;
use crate::model::SimilarityReport;

/// Ratio of matched content between two token sequences, in [0, 1].
///
/// Repeatedly finds the longest contiguous matching block, recurses on the
/// unmatched remainders on each side, sums the matched lengths M, and
/// returns `2 * M / (len_a + len_b)`. Identical sequences score 1.0,
/// disjoint ones 0.0, and two empty sequences 1.0.
///
/// Not guaranteed symmetric: when the longest match ties, the block earliest
/// in `a` wins, so swapping unequal-length arguments can change the result.
/// Worst case is superlinear in sequence length; very large graphs should be
/// compared in chunks.
pub fn matching_ratio<T: Eq>(a: &[T], b: &[T]) -> f64 {
    let total_len = a.len() + b.len();
    if total_len == 0 {
        return 1.0;
    }
    2.0 * matched_total(a, b) as f64 / total_len as f64
}

fn matched_total<T: Eq>(a: &[T], b: &[T]) -> usize {
    let mut total = 0;
    let mut pending = vec![((0, a.len()), (0, b.len()))];
    while let Some(((a_lo, a_hi), (b_lo, b_hi))) = pending.pop() {
        let (i, j, k) = longest_match(&a[a_lo..a_hi], &b[b_lo..b_hi]);
        if k == 0 {
            continue;
        }
        total += k;
        pending.push(((a_lo, a_lo + i), (b_lo, b_lo + j)));
        pending.push(((a_lo + i + k, a_hi), (b_lo + j + k, b_hi)));
    }
    total
}

/// Longest contiguous matching block between `a` and `b`, returned as
/// (start in a, start in b, length). Ties break toward the earliest start
/// in `a`, then the earliest start in `b`.
fn longest_match<T: Eq>(a: &[T], b: &[T]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for (i, item) in a.iter().enumerate() {
        row[0] = 0;
        for j in 0..b.len() {
            if *item == b[j] {
                let run = prev[j] + 1;
                row[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            } else {
                row[j + 1] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut row);
    }
    best
}

/// Canonical, sorted, flat token encoding of a graph: one token per node
/// from (id, kind), then one token per edge from (source, target, label,
/// style), each group sorted lexicographically so declaration order never
/// affects the score. Kinds are encoded by their declaration keyword, so a
/// node that was only ever referenced in a relation encodes the same as the
/// declared component it reparses into.
pub fn structural_tokens(graph: &Graph) -> Vec<String> {
    let mut tokens = Vec::with_capacity(graph.node_count() + graph.edge_count());
    for id in graph.sorted_ids() {
        let node = graph.node(&id).expect("id from sorted_ids");
        tokens.push(format!("node {} {}", node.id, node.kind.keyword()));
    }
    for edge in graph.sorted_edges() {
        tokens.push(format!(
            "edge {} {} {} {}",
            edge.source,
            edge.target,
            edge.label.as_deref().unwrap_or(""),
            edge.style.as_str()
        ));
    }
    tokens
}

/// Structural similarity between two normalized graphs.
pub fn structural_score(a: &Graph, b: &Graph) -> f64 {
    matching_ratio(&structural_tokens(a), &structural_tokens(b))
}

/// Textual similarity between two raw diagram texts. The texts are not
/// parsed; lines are compared after dropping `@startuml`/`@enduml` markers,
/// trailing `'` comments, and blank lines, so the score stays sensitive to
/// incidental formatting such as declaration order.
pub fn textual_score(a: &str, b: &str) -> f64 {
    matching_ratio(&preprocess_lines(a), &preprocess_lines(b))
}

fn preprocess_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let stripped = line.split('\'').next().unwrap_or("").trim();
            if stripped.is_empty() {
                return None;
            }
            if stripped.eq_ignore_ascii_case("@startuml")
                || stripped.eq_ignore_ascii_case("@enduml")
            {
                return None;
            }
            Some(stripped.to_string())
        })
        .collect()
}

/// Compute both scores for a pair of diagrams.
pub fn compare(
    graph_a: &Graph,
    graph_b: &Graph,
    text_a: &str,
    text_b: &str,
) -> SimilarityReport {
    SimilarityReport {
        structural: structural_score(graph_a, graph_b),
        textual: textual_score(text_a, text_b),
    }
}
