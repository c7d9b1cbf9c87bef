//! Castgraph Graph - Relationship graph accumulation and export
//!
//! Accumulates typed, weighted relationships between cast members,
//! overlays curated facts, groups the result for reporting and
//! persists it between crawl sessions.
//!
//! Author: hephaex@gmail.com

pub mod analysis;
pub mod graph;
pub mod render;
pub mod store;

pub use analysis::{
    classify, relationship_network, Classification, ClassifiedEdge, InteractionEntry,
    NetworkLink, RelationshipReport,
};
pub use graph::{Edge, EdgeKey, Interaction, MergeReport, RelationshipGraph, DEFAULT_MAX_SNIPPETS};
pub use render::{to_dot, to_petgraph};
pub use store::{GraphSnapshot, GraphStore, JsonFileStore};
