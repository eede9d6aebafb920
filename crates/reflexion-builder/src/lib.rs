//! Reflexion Builder — dependency-dump to diagram conversion
//!
//! Consumes the flat "producer consumer" pair format, builds a directed
//! multigraph, applies inclusion/exclusion filters, and re-serializes the
//! result into the diagram DSL for the parser.

pub mod dump;
pub mod serialize;


use reflexion_core::Graph;
use serde::{Deserialize, Serialize};

pub use dump::{build, simplify_label};
pub use serialize::serialize;

/// Filtering and output options for a build run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Allow-list of id prefixes; empty or `*` keeps everything.
    pub packages: Vec<String>,
    /// Prefixes removed after the allow-list is applied.
    pub hide_packages: Vec<String>,
    /// Keep only nodes within this BFS depth of a root.
    pub max_depth: Option<u32>,
    /// Annotate serialized edges with the consumer's version.
    pub show_version: bool,
    /// Drop zero-degree nodes after filtering.
    pub remove_isolated: bool,
}

/// A dump line that could not be parsed into a producer/consumer pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DumpWarning {
    pub line: usize,
    pub text: String,
}

/// Result of a successful build.
#[derive(Debug)]
pub struct Built {
    pub graph: Graph,
    pub warnings: Vec<DumpWarning>,
}

/// A build that cannot produce a meaningful diagram. A silently empty
/// diagram would be misleading, so these are named errors instead.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BuildError {
    #[error("dependency dump contains no producer/consumer pairs")]
    EmptyDump,
    #[error("package filters (allow {packages:?}, hide {hide_packages:?}) removed every module")]
    FilteredEmpty {
        packages: Vec<String>,
        hide_packages: Vec<String>,
    },
    #[error("every remaining module was isolated and removed")]
    AllIsolated,
}
