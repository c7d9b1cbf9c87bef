//! castgraph Core - Domain models, errors, and shared configuration
//!
//! This crate defines the core abstractions used throughout castgraph:
//! - Entity identifiers and canonical (unordered) entity pairs
//! - The closed set of relationship types
//! - Text units and evidence triples produced during ingestion
//! - Curated facts used as an authoritative overlay
//! - Common error types
//! - Configuration management

pub mod config;
pub mod curated;
pub mod presets;

pub use config::{
    AppConfig, ConfigError, CrawlerConfig, ExtractionConfig, LoggingConfig, PairingMode,
};
pub use curated::CuratedFact;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for castgraph operations
#[derive(Error, Debug)]
pub enum CastError {
    #[error("Source unavailable: {source_id}: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    #[error("Malformed curated fact #{index}: {reason}")]
    MalformedCuratedFact { index: usize, reason: String },

    #[error("Unknown relation type: {0}")]
    UnknownRelationType(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CastError>;

// ============================================================================
// Entities
// ============================================================================

/// Canonical identifier of a cast member (e.g. "Oliver Queen")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An unordered pair of distinct entities.
///
/// The pair is stored in canonical order (`first <= second`), so `(A, B)`
/// and `(B, A)` construct equal values and hash to the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "PairRecord")]
pub struct EntityPair {
    first: EntityId,
    second: EntityId,
}

/// Wire form of a pair; canonical order is re-established on load
#[derive(Deserialize)]
struct PairRecord {
    first: EntityId,
    second: EntityId,
}

impl TryFrom<PairRecord> for EntityPair {
    type Error = String;

    fn try_from(record: PairRecord) -> std::result::Result<Self, Self::Error> {
        Self::new(record.first, record.second)
            .ok_or_else(|| "entity pair members must differ".to_string())
    }
}

impl EntityPair {
    /// Build a canonical pair. Returns `None` when both sides are the same entity.
    pub fn new(a: impl Into<EntityId>, b: impl Into<EntityId>) -> Option<Self> {
        let (a, b) = (a.into(), b.into());
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self {
                first: a,
                second: b,
            }),
            std::cmp::Ordering::Greater => Some(Self {
                first: b,
                second: a,
            }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn first(&self) -> &EntityId {
        &self.first
    }

    pub fn second(&self) -> &EntityId {
        &self.second
    }

    pub fn contains(&self, entity: &EntityId) -> bool {
        &self.first == entity || &self.second == entity
    }

    /// The member of the pair that is not `entity`
    pub fn other(&self, entity: &EntityId) -> Option<&EntityId> {
        if &self.first == entity {
            Some(&self.second)
        } else if &self.second == entity {
            Some(&self.first)
        } else {
            None
        }
    }
}

impl std::fmt::Display for EntityPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} & {}", self.first, self.second)
    }
}

// ============================================================================
// Relation Types
// ============================================================================

/// Relationship types recognized between cast members
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Romantic,
    Familial,
    Friendship,
    Conflict,
    Mentorship,
}

impl RelationType {
    /// All relation types in reporting order
    pub const ALL: [RelationType; 5] = [
        Self::Romantic,
        Self::Familial,
        Self::Friendship,
        Self::Conflict,
        Self::Mentorship,
    ];

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Romantic => "romantic",
            Self::Familial => "familial",
            Self::Friendship => "friendship",
            Self::Conflict => "conflict",
            Self::Mentorship => "mentorship",
        }
    }

    /// Key used for this type's section in the exported report
    pub fn section_name(&self) -> &'static str {
        match self {
            Self::Romantic => "romantic_relationships",
            Self::Familial => "familial_bonds",
            Self::Friendship => "friendships",
            Self::Conflict => "rivalries",
            Self::Mentorship => "mentor_relationships",
        }
    }

    /// Heading used in console reports
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Romantic => "ROMANTIC RELATIONSHIPS",
            Self::Familial => "FAMILIAL BONDS",
            Self::Friendship => "FRIENDSHIPS",
            Self::Conflict => "RIVALRIES & CONFLICTS",
            Self::Mentorship => "MENTOR RELATIONSHIPS",
        }
    }

    /// Edge color used when rendering the network
    pub fn color(&self) -> &'static str {
        match self {
            Self::Romantic => "red",
            Self::Familial => "blue",
            Self::Friendship => "green",
            Self::Conflict => "orange",
            Self::Mentorship => "purple",
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RelationType {
    type Err = CastError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "romantic" => Ok(Self::Romantic),
            "familial" => Ok(Self::Familial),
            "friendship" => Ok(Self::Friendship),
            "conflict" => Ok(Self::Conflict),
            "mentorship" => Ok(Self::Mentorship),
            _ => Err(CastError::UnknownRelationType(s.to_string())),
        }
    }
}

// ============================================================================
// Ingestion Units
// ============================================================================

/// A sentence-sized span of prose plus the source it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub text: String,
    pub source_id: String,
}

impl TextUnit {
    pub fn new(text: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_id: source_id.into(),
        }
    }

    /// Leading context of the unit, truncated to `max_chars` characters
    pub fn snippet(&self, max_chars: usize) -> String {
        let trimmed = self.text.trim();
        if trimmed.chars().count() <= max_chars {
            return trimmed.to_string();
        }
        let head: String = trimmed.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

/// One observed (pair, relation type) instance from a single text unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceTriple {
    pub pair: EntityPair,
    pub relation: RelationType,
    /// Context the relation was observed in
    pub snippet: String,
    /// Source the text unit belonged to
    pub source_id: String,
}

impl EvidenceTriple {
    pub fn new(pair: EntityPair, relation: RelationType) -> Self {
        Self {
            pair,
            relation,
            snippet: String::new(),
            source_id: String::new(),
        }
    }

    /// Attach provenance
    pub fn with_provenance(
        mut self,
        snippet: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        self.snippet = snippet.into();
        self.source_id = source_id.into();
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
