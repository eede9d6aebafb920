//! Reflexion Core — diagram graph model, normalizer, and similarity scorer

pub mod graph;
pub mod model;
pub mod normalize;
pub mod score;


pub use graph::{Graph, GraphError};
pub use model::{
    DiagramEdge, DiagramNode, EdgeStyle, NodeKind, SimilarityReport, canonical_id, namespaced_id,
};
pub use normalize::{NormalizeOptions, normalize};
pub use score::{compare, matching_ratio, structural_score, structural_tokens, textual_score};
