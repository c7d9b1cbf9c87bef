//! castgraph Extractor - Knowledge extraction pipeline
//!
//! Finds cast members in prose by alias matching and tags the
//! relationships between them using indicator phrases.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use castgraph_core::{EntityId, EntityPair, RelationType};

pub mod catalog;
pub mod lexicon;
pub mod ner;
pub mod pipeline;
pub mod relation;
pub mod segment;

pub use catalog::AliasCatalog;
pub use lexicon::RelationLexicon;
pub use ner::AliasMatcher;
pub use pipeline::{ExtractionPipeline, UnitExtraction};
pub use relation::IndicatorTagger;

/// Matching is case-insensitive; both text and patterns go through this.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// An entity found in a text unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub entity: EntityId,
    /// Alias that matched first
    pub alias: String,
    /// Byte offset of the earliest alias occurrence in the normalized text
    pub offset: usize,
}

/// A relation implied by a single text unit
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaggedRelation {
    pub pair: EntityPair,
    pub relation: RelationType,
}

/// Trait for entity extractors
pub trait EntityExtractor: Send + Sync {
    /// Entities with at least one alias present in `text`
    fn extract_entities(&self, text: &str) -> BTreeSet<EntityId>;

    /// Matched entities ordered by first occurrence
    fn locate_entities(&self, text: &str) -> Vec<Mention>;
}

/// Trait for relation extractors
pub trait RelationExtractor: Send + Sync {
    fn extract_relations(
        &self,
        text: &str,
        entities: &BTreeSet<EntityId>,
    ) -> BTreeSet<TaggedRelation>;
}
