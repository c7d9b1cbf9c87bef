//! Relationship graph
//!
//! Evidence is keyed by (canonical entity pair, relation type). Keys are
//! built from [`EntityPair`], which orders its members, so observations
//! recorded as (A, B) and (B, A) land on the same edge. Every key is
//! explicitly created with a zero count on first access before it is
//! incremented.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use castgraph_core::{CastError, CuratedFact, EntityId, EntityPair, EvidenceTriple, RelationType};

/// Default number of provenance snippets kept per edge
pub const DEFAULT_MAX_SNIPPETS: usize = 5;

/// Composite key of an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub pair: EntityPair,
    pub relation: RelationType,
}

/// A typed relationship between two entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub pair: EntityPair,
    pub relation: RelationType,
    /// Number of text units that produced this (pair, type)
    pub evidence: u64,
    /// Authoritative description from a curated fact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sample contexts the relation was observed in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snippets: Vec<String>,
    /// Sources that contributed evidence
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub sources: BTreeSet<String>,
}

impl Edge {
    fn empty(pair: EntityPair, relation: RelationType) -> Self {
        Self {
            pair,
            relation,
            evidence: 0,
            description: None,
            snippets: Vec::new(),
            sources: BTreeSet::new(),
        }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            pair: self.pair.clone(),
            relation: self.relation,
        }
    }

    /// Whether a curated fact annotates this edge
    pub fn is_curated(&self) -> bool {
        self.description.is_some()
    }
}

/// Untyped co-occurrence count for a pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub pair: EntityPair,
    pub count: u64,
}

/// Outcome of merging a curated fact list
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Facts applied to the graph
    pub applied: usize,
    /// Facts rejected as malformed, with the reason
    pub rejected: Vec<CastError>,
}

impl MergeReport {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Typed, weighted relationship graph between entities
#[derive(Debug, Clone)]
pub struct RelationshipGraph {
    nodes: Vec<EntityId>,
    node_index: HashSet<EntityId>,
    edges: Vec<Edge>,
    edge_index: HashMap<EdgeKey, usize>,
    interactions: Vec<Interaction>,
    interaction_index: HashMap<EntityPair, usize>,
    max_snippets: usize,
}

impl Default for RelationshipGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationshipGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashSet::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
            interactions: Vec::new(),
            interaction_index: HashMap::new(),
            max_snippets: DEFAULT_MAX_SNIPPETS,
        }
    }

    /// Set how many provenance snippets each edge keeps
    pub fn with_max_snippets(mut self, max_snippets: usize) -> Self {
        self.set_max_snippets(max_snippets);
        self
    }

    /// Change the snippet limit; applies to later recordings only
    pub fn set_max_snippets(&mut self, max_snippets: usize) {
        self.max_snippets = max_snippets;
    }

    pub fn max_snippets(&self) -> usize {
        self.max_snippets
    }

    fn add_node(&mut self, entity: &EntityId) {
        if self.node_index.insert(entity.clone()) {
            self.nodes.push(entity.clone());
        }
    }

    /// Index of the edge for `key`, creating it with a zero count if absent
    fn edge_slot(&mut self, pair: &EntityPair, relation: RelationType) -> usize {
        let key = EdgeKey {
            pair: pair.clone(),
            relation,
        };
        if let Some(&index) = self.edge_index.get(&key) {
            return index;
        }

        self.add_node(pair.first());
        self.add_node(pair.second());
        self.edges.push(Edge::empty(pair.clone(), relation));
        let index = self.edges.len() - 1;
        self.edge_index.insert(key, index);
        index
    }

    /// Add one unit of evidence for the triple's (pair, type).
    ///
    /// Not idempotent: recording the same triple twice adds two. Returns
    /// the edge's count after the increment.
    pub fn record_evidence(&mut self, triple: &EvidenceTriple) -> u64 {
        let index = self.edge_slot(&triple.pair, triple.relation);
        let max_snippets = self.max_snippets;
        let edge = &mut self.edges[index];

        edge.evidence += 1;
        if !triple.snippet.is_empty()
            && edge.snippets.len() < max_snippets
            && !edge.snippets.contains(&triple.snippet)
        {
            edge.snippets.push(triple.snippet.clone());
        }
        if !triple.source_id.is_empty() {
            edge.sources.insert(triple.source_id.clone());
        }
        edge.evidence
    }

    /// Count one co-occurrence of the pair, regardless of relation type
    pub fn record_cooccurrence(&mut self, pair: &EntityPair) -> u64 {
        let index = match self.interaction_index.get(pair) {
            Some(&index) => index,
            None => {
                self.interactions.push(Interaction {
                    pair: pair.clone(),
                    count: 0,
                });
                let index = self.interactions.len() - 1;
                self.interaction_index.insert(pair.clone(), index);
                index
            }
        };

        let interaction = &mut self.interactions[index];
        interaction.count += 1;
        interaction.count
    }

    /// Overlay curated facts on the graph.
    ///
    /// Each valid fact sets the description of its (pair, type) edge,
    /// creating the edge with zero evidence if needed. Evidence counts are
    /// left untouched. Malformed facts are skipped and reported; the rest
    /// of the list is still applied. Merging the same list twice leaves
    /// the graph unchanged.
    pub fn merge_curated_facts(&mut self, facts: &[CuratedFact]) -> MergeReport {
        let mut report = MergeReport::default();

        for (index, fact) in facts.iter().enumerate() {
            match fact.resolve(index) {
                Ok((pair, relation, description)) => {
                    let slot = self.edge_slot(&pair, relation);
                    self.edges[slot].description = Some(description.to_string());
                    report.applied += 1;
                }
                Err(e) => {
                    tracing::warn!("Rejected curated fact: {}", e);
                    report.rejected.push(e);
                }
            }
        }

        report
    }

    /// Edges of one type, in insertion order
    pub fn edges_by_type(&self, relation: RelationType) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| e.relation == relation)
            .collect()
    }

    pub fn edge(&self, pair: &EntityPair, relation: RelationType) -> Option<&Edge> {
        let key = EdgeKey {
            pair: pair.clone(),
            relation,
        };
        self.edge_index.get(&key).map(|&index| &self.edges[index])
    }

    /// Evidence count for (pair, type), zero when absent
    pub fn evidence_count(&self, pair: &EntityPair, relation: RelationType) -> u64 {
        self.edge(pair, relation).map(|e| e.evidence).unwrap_or(0)
    }

    /// Edges touching `entity`
    pub fn edges_of<'a>(&'a self, entity: &'a EntityId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.pair.contains(entity))
    }

    pub fn interaction_count(&self, pair: &EntityPair) -> u64 {
        self.interaction_index
            .get(pair)
            .map(|&index| self.interactions[index].count)
            .unwrap_or(0)
    }

    pub fn nodes(&self) -> &[EntityId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Sum of evidence over all edges
    pub fn total_evidence(&self) -> u64 {
        self.edges.iter().map(|e| e.evidence).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.interactions.is_empty()
    }

    fn from_record(record: GraphRecord) -> Self {
        let mut graph = Self::new().with_max_snippets(record.max_snippets);

        for node in &record.nodes {
            graph.add_node(node);
        }
        for edge in record.edges {
            let slot = graph.edge_slot(&edge.pair, edge.relation);
            let target = &mut graph.edges[slot];
            target.evidence += edge.evidence;
            if target.description.is_none() {
                target.description = edge.description;
            }
            for snippet in edge.snippets {
                if target.snippets.len() < graph.max_snippets && !target.snippets.contains(&snippet)
                {
                    target.snippets.push(snippet);
                }
            }
            target.sources.extend(edge.sources);
        }
        for interaction in record.interactions {
            let index = match graph.interaction_index.get(&interaction.pair) {
                Some(&index) => index,
                None => {
                    graph.interactions.push(Interaction {
                        pair: interaction.pair.clone(),
                        count: 0,
                    });
                    let index = graph.interactions.len() - 1;
                    graph.interaction_index.insert(interaction.pair, index);
                    index
                }
            };
            graph.interactions[index].count += interaction.count;
        }

        graph
    }
}

// ============================================================================
// Serialization
// ============================================================================

fn default_max_snippets() -> usize {
    DEFAULT_MAX_SNIPPETS
}

/// Borrowed view written to disk; indices are rebuilt on load.
#[derive(Serialize)]
struct GraphView<'a> {
    nodes: &'a [EntityId],
    edges: &'a [Edge],
    interactions: &'a [Interaction],
    max_snippets: usize,
}

#[derive(Deserialize)]
struct GraphRecord {
    #[serde(default)]
    nodes: Vec<EntityId>,
    #[serde(default)]
    edges: Vec<Edge>,
    #[serde(default)]
    interactions: Vec<Interaction>,
    #[serde(default = "default_max_snippets")]
    max_snippets: usize,
}

impl Serialize for RelationshipGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphView {
            nodes: &self.nodes,
            edges: &self.edges,
            interactions: &self.interactions,
            max_snippets: self.max_snippets,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RelationshipGraph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        GraphRecord::deserialize(deserializer).map(Self::from_record)
    }
}

// ============================================================================
// Tests
// ============================================================================
