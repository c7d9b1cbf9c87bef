//! Analysis & export
//!
//! Groups the graph's edges by relation type for reporting and builds the
//! serializable report handed to persistence and rendering.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use castgraph_core::{EntityId, RelationType};

use crate::{Edge, RelationshipGraph};

/// One relationship in a grouped report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEdge {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// Crawled evidence count (zero for curated-only relationships)
    pub evidence: u64,
    /// Curated description, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// True when the entry is backed by a curated fact
    pub authoritative: bool,
}

impl ClassifiedEdge {
    fn from_edge(edge: &Edge) -> Self {
        Self {
            entity_a: edge.pair.first().clone(),
            entity_b: edge.pair.second().clone(),
            evidence: edge.evidence,
            description: edge.description.clone(),
            authoritative: edge.is_curated(),
        }
    }

    /// "A & B"
    pub fn characters(&self) -> String {
        format!("{} & {}", self.entity_a, self.entity_b)
    }

    /// Curated description, or the evidence count when there is none
    pub fn summary(&self) -> String {
        match &self.description {
            Some(description) if self.evidence > 0 => {
                format!("{description} ({} mentions)", self.evidence)
            }
            Some(description) => description.clone(),
            None => format!("{} mentions", self.evidence),
        }
    }
}

/// Relation type -> relationships of that type, in graph insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    groups: BTreeMap<RelationType, Vec<ClassifiedEdge>>,
}

impl Classification {
    /// Edges of `relation` (empty when none were found)
    pub fn get(&self, relation: RelationType) -> &[ClassifiedEdge] {
        self.groups
            .get(&relation)
            .map(|edges| edges.as_slice())
            .unwrap_or(&[])
    }

    /// Groups in reporting order, including empty ones
    pub fn iter(&self) -> impl Iterator<Item = (RelationType, &[ClassifiedEdge])> + '_ {
        RelationType::ALL
            .into_iter()
            .map(move |relation| (relation, self.get(relation)))
    }

    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Group the graph's edges by relation type
pub fn classify(graph: &RelationshipGraph) -> Classification {
    let mut groups: BTreeMap<RelationType, Vec<ClassifiedEdge>> = BTreeMap::new();
    for edge in graph.edges() {
        groups
            .entry(edge.relation)
            .or_default()
            .push(ClassifiedEdge::from_edge(edge));
    }
    Classification { groups }
}

// ============================================================================
// Relationship network
// ============================================================================

/// One link in an entity's adjacency list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkLink {
    pub with: EntityId,
    #[serde(rename = "type")]
    pub relation: RelationType,
    pub evidence: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Entity -> links to every entity it shares an edge with
pub fn relationship_network(graph: &RelationshipGraph) -> BTreeMap<EntityId, Vec<NetworkLink>> {
    let mut network: BTreeMap<EntityId, Vec<NetworkLink>> = BTreeMap::new();

    for edge in graph.edges() {
        let (a, b) = (edge.pair.first(), edge.pair.second());
        for (from, to) in [(a, b), (b, a)] {
            network.entry(from.clone()).or_default().push(NetworkLink {
                with: to.clone(),
                relation: edge.relation,
                evidence: edge.evidence,
                description: edge.description.clone(),
            });
        }
    }

    network
}

// ============================================================================
// Report
// ============================================================================

/// Untyped co-occurrence entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEntry {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub count: u64,
}

/// Serializable export of the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipReport {
    /// Section name (e.g. "romantic_relationships") -> entries
    #[serde(flatten)]
    pub sections: BTreeMap<String, Vec<ClassifiedEdge>>,
    pub relationship_network: BTreeMap<EntityId, Vec<NetworkLink>>,
    pub interactions: Vec<InteractionEntry>,
    pub generated_at: DateTime<Utc>,
}

impl RelationshipReport {
    /// Build the full report for `graph`
    pub fn build(graph: &RelationshipGraph) -> Self {
        let classification = classify(graph);
        let sections = classification
            .iter()
            .map(|(relation, edges)| (relation.section_name().to_string(), edges.to_vec()))
            .collect();

        let mut interactions: Vec<InteractionEntry> = graph
            .interactions()
            .iter()
            .map(|i| InteractionEntry {
                entity_a: i.pair.first().clone(),
                entity_b: i.pair.second().clone(),
                count: i.count,
            })
            .collect();
        interactions.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            sections,
            relationship_network: relationship_network(graph),
            interactions,
            generated_at: Utc::now(),
        }
    }

    pub fn section(&self, relation: RelationType) -> &[ClassifiedEdge] {
        self.sections
            .get(relation.section_name())
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
    }

    pub fn to_json_pretty(&self) -> castgraph_core::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castgraph_core::{CuratedFact, EntityPair, EvidenceTriple};

    fn record(graph: &mut RelationshipGraph, a: &str, b: &str, relation: RelationType) {
        graph.record_evidence(&EvidenceTriple::new(EntityPair::new(a, b).unwrap(), relation));
    }

    #[test]
    fn test_classify_groups_by_type() {
        let mut graph = RelationshipGraph::new();
        record(&mut graph, "A", "B", RelationType::Familial);
        record(&mut graph, "A", "B", RelationType::Conflict);
        record(&mut graph, "C", "B", RelationType::Familial);

        let classification = classify(&graph);
        assert_eq!(classification.total(), 3);

        let familial = classification.get(RelationType::Familial);
        assert_eq!(familial.len(), 2);
        assert_eq!(familial[0].characters(), "A & B");
        assert_eq!(familial[1].characters(), "B & C");
        assert!(classification.get(RelationType::Romantic).is_empty());
        assert_eq!(classification.iter().count(), 5);
    }

    #[test]
    fn test_curated_entry_is_authoritative() {
        let mut graph = RelationshipGraph::new();
        graph.merge_curated_facts(&[CuratedFact::new(
            "A",
            "B",
            RelationType::Romantic,
            "Engaged",
        )]);

        let classification = classify(&graph);
        let romantic = classification.get(RelationType::Romantic);
        assert_eq!(romantic.len(), 1);
        assert!(romantic[0].authoritative);
        assert_eq!(romantic[0].evidence, 0);
        assert_eq!(romantic[0].summary(), "Engaged");
    }

    #[test]
    fn test_summary_variants() {
        let mut edge = ClassifiedEdge {
            entity_a: EntityId::from("A"),
            entity_b: EntityId::from("B"),
            evidence: 3,
            description: None,
            authoritative: false,
        };
        assert_eq!(edge.summary(), "3 mentions");

        edge.description = Some("Partners".to_string());
        edge.authoritative = true;
        assert_eq!(edge.summary(), "Partners (3 mentions)");
    }

    #[test]
    fn test_network_is_listed_from_both_sides() {
        let mut graph = RelationshipGraph::new();
        record(&mut graph, "A", "B", RelationType::Mentorship);

        let network = relationship_network(&graph);
        assert_eq!(network[&EntityId::from("A")][0].with, EntityId::from("B"));
        assert_eq!(network[&EntityId::from("B")][0].with, EntityId::from("A"));
    }

    #[test]
    fn test_report_json_sections() {
        let mut graph = RelationshipGraph::new();
        record(&mut graph, "A", "B", RelationType::Conflict);
        graph.record_cooccurrence(&EntityPair::new("A", "B").unwrap());

        let report = RelationshipReport::build(&graph);
        assert_eq!(report.section(RelationType::Conflict).len(), 1);

        let json: serde_json::Value =
            serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["rivalries"][0]["entity_a"], "A");
        assert_eq!(json["rivalries"][0]["evidence"], 1);
        assert!(json["romantic_relationships"].as_array().unwrap().is_empty());
        assert_eq!(json["relationship_network"]["A"][0]["type"], "conflict");
        assert_eq!(json["interactions"][0]["count"], 1);
    }
}
