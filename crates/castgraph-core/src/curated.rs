//! Curated facts
//!
//! Manually authored relationship records that overlay crawled evidence.
//! Fields are optional at deserialization time so that a partially written
//! record can be rejected on its own instead of failing the whole file.

use serde::{Deserialize, Serialize};

use crate::{CastError, EntityPair, RelationType, Result};

/// An authoritative (entity, entity, relation, description) record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedFact {
    #[serde(default)]
    pub entity_a: String,
    #[serde(default)]
    pub entity_b: String,
    #[serde(default)]
    pub relation: String,
    #[serde(default)]
    pub description: String,
}

impl CuratedFact {
    pub fn new(
        entity_a: impl Into<String>,
        entity_b: impl Into<String>,
        relation: RelationType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            entity_a: entity_a.into(),
            entity_b: entity_b.into(),
            relation: relation.as_str().to_string(),
            description: description.into(),
        }
    }

    /// Check every required field and resolve the fact into graph terms.
    ///
    /// `index` is the position of the fact in its list and is only used
    /// for error reporting.
    pub fn resolve(&self, index: usize) -> Result<(EntityPair, RelationType, &str)> {
        let malformed = |reason: &str| CastError::MalformedCuratedFact {
            index,
            reason: reason.to_string(),
        };

        let entity_a = self.entity_a.trim();
        let entity_b = self.entity_b.trim();
        if entity_a.is_empty() {
            return Err(malformed("missing entity_a"));
        }
        if entity_b.is_empty() {
            return Err(malformed("missing entity_b"));
        }
        if self.relation.trim().is_empty() {
            return Err(malformed("missing relation"));
        }
        let relation: RelationType = self
            .relation
            .parse()
            .map_err(|_| malformed(&format!("unknown relation '{}'", self.relation)))?;

        let description = self.description.trim();
        if description.is_empty() {
            return Err(malformed("missing description"));
        }

        let pair = EntityPair::new(entity_a, entity_b)
            .ok_or_else(|| malformed("entity_a and entity_b are the same entity"))?;

        Ok((pair, relation, description))
    }
}
