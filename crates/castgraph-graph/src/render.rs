//! Network rendering
//!
//! Converts the relationship graph into a petgraph graph and renders it
//! as Graphviz DOT, one colored edge per (pair, relation type).

use std::collections::HashMap;

use petgraph::dot::{Config, Dot};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use castgraph_core::EntityId;

use crate::{Edge, RelationshipGraph};

/// Build an undirected petgraph graph; parallel edges keep distinct types apart.
pub fn to_petgraph(graph: &RelationshipGraph) -> UnGraph<EntityId, Edge> {
    let mut out = UnGraph::new_undirected();
    let mut index: HashMap<&EntityId, NodeIndex> = HashMap::new();

    for node in graph.nodes() {
        index.insert(node, out.add_node(node.clone()));
    }

    for edge in graph.edges() {
        let a = *index
            .entry(edge.pair.first())
            .or_insert_with(|| out.add_node(edge.pair.first().clone()));
        let b = *index
            .entry(edge.pair.second())
            .or_insert_with(|| out.add_node(edge.pair.second().clone()));
        out.add_edge(a, b, edge.clone());
    }

    out
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn edge_label(edge: &Edge) -> String {
    match (&edge.description, edge.evidence) {
        (Some(_), 0) => "curated".to_string(),
        (_, evidence) => evidence.to_string(),
    }
}

/// Render the graph as DOT text
pub fn to_dot(graph: &RelationshipGraph) -> String {
    let network = to_petgraph(graph);
    let dot = Dot::with_attr_getters(
        &network,
        &[Config::EdgeNoLabel, Config::NodeNoLabel],
        &|_, edge| {
            let weight = edge.weight();
            format!(
                "label=\"{}\" color=\"{}\" tooltip=\"{}\"",
                edge_label(weight),
                weight.relation.color(),
                weight.relation.as_str(),
            )
        },
        &|_, (_, entity)| format!("label=\"{}\"", escape(entity.as_str())),
    );
    format!("{dot:?}")
}
