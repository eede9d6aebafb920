//! Core data structures for architecture diagrams

use serde::{Deserialize, Serialize};

/// Discriminates what kind of diagram entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Component,
    Interface,
    Class,
    /// A namespace/package container, including synthetic nodes created by
    /// collapsing a namespace subtree into one box.
    Package,
    /// Referenced in a relation but never declared.
    Unknown,
}

impl NodeKind {
    /// Declaration keyword this kind serializes to and reparses from.
    /// Implicitly created nodes come back as plain components, so everything
    /// that renders or encodes a kind goes through this one mapping.
    pub fn keyword(&self) -> &'static str {
        match self {
            NodeKind::Component | NodeKind::Unknown => "component",
            NodeKind::Interface => "interface",
            NodeKind::Class => "class",
            NodeKind::Package => "package",
        }
    }
}

/// How a relation is drawn in the diagram DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeStyle {
    SolidAssociation,
    DashedDependency,
    Composition,
    Inheritance,
}

impl EdgeStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeStyle::SolidAssociation => "solid",
            EdgeStyle::DashedDependency => "dashed",
            EdgeStyle::Composition => "composition",
            EdgeStyle::Inheritance => "inheritance",
        }
    }

    /// The arrow token this style serializes to.
    pub fn arrow(&self) -> &'static str {
        match self {
            EdgeStyle::SolidAssociation => "-->",
            EdgeStyle::DashedDependency => "..>",
            EdgeStyle::Composition => "*-->",
            EdgeStyle::Inheritance => "--|>",
        }
    }
}

/// A single node in a diagram graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagramNode {
    /// Canonical identifier, unique within a graph.
    pub id: String,
    /// Human-readable display label, possibly using the
    /// "Organisation | Project" convention.
    pub label: String,
    pub kind: NodeKind,
    /// Enclosing package names, outermost first. Empty for top-level and
    /// implicitly created nodes.
    pub namespace: Vec<String>,
    /// Version string carried over from a dependency dump, if any.
    pub version: Option<String>,
}

impl DiagramNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        DiagramNode {
            id: id.into(),
            label: label.into(),
            kind,
            namespace: Vec::new(),
            version: None,
        }
    }
}

/// A directed edge between two nodes, identified by their canonical ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagramEdge {
    pub source: String,
    pub target: String,
    /// Free-text relation label ("implements", "builds", ...).
    pub label: Option<String>,
    pub style: EdgeStyle,
    /// Consumer version from a dependency dump, if any.
    pub version: Option<String>,
}

impl DiagramEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, style: EdgeStyle) -> Self {
        DiagramEdge {
            source: source.into(),
            target: target.into(),
            label: None,
            style,
            version: None,
        }
    }
}

/// The two independent similarity outputs, both in [0, 1].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimilarityReport {
    /// Computed over the canonical token sequences of the normalized graphs.
    pub structural: f64,
    /// Computed over the preprocessed raw lines, no parsing involved.
    pub textual: f64,
}

/// Derive a canonical identifier from a raw name: case-fold, replace runs of
/// non-alphanumerics with a single underscore, trim leading/trailing
/// underscores. Cosmetic renaming (`Foo-Bar` vs `foo.bar`) maps to the same
/// id; genuinely different spellings (`Podman` vs `podman_v5`) do not.
pub fn canonical_id(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Canonical id for a name declared inside a namespace path.
pub fn namespaced_id(namespace: &[String], raw: &str) -> String {
    if namespace.is_empty() {
        return canonical_id(raw);
    }
    let mut joined = String::new();
    for part in namespace {
        joined.push_str(&canonical_id(part));
        joined.push('_');
    }
    joined.push_str(&canonical_id(raw));
    joined
}
