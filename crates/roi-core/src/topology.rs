//! Directed bus graph built from a network's links and lines.
//!
//! Building the graph is the one place where edge endpoints are resolved
//! against the bus collection. An edge with an endpoint that does not resolve
//! is left out of the graph, logged once through `tracing`, and recorded in
//! the caller's [`Diagnostics`] under the `topology` category.

use crate::{BusId, Diagnostics, Edge, NetworkView};
use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Link,
    Line,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Link => "link",
            EdgeKind::Line => "line",
        }
    }
}

/// Edge weight: position of the component in its network collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeKey {
    Link(usize),
    Line(usize),
}

impl EdgeKey {
    pub fn kind(&self) -> EdgeKind {
        match self {
            EdgeKey::Link(_) => EdgeKind::Link,
            EdgeKey::Line(_) => EdgeKind::Line,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            EdgeKey::Link(i) | EdgeKey::Line(i) => *i,
        }
    }
}

/// An edge left out because an endpoint did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEdge {
    pub key: EdgeKey,
    pub id: String,
    pub missing: BusId,
}

/// Bus graph with one node per bus and one directed edge (bus0 → bus1) per
/// resolvable link or line. Edges are added links first, then lines, each in
/// collection order.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub graph: DiGraph<BusId, EdgeKey>,
    nodes: HashMap<BusId, NodeIndex>,
    skipped: Vec<SkippedEdge>,
}

impl Topology {
    pub fn build<N: NetworkView + ?Sized>(network: &N, diag: &mut Diagnostics) -> Self {
        let mut topology = Topology::default();
        for bus in network.buses() {
            let node = topology.graph.add_node(bus.id.clone());
            topology.nodes.insert(bus.id.clone(), node);
        }
        for (i, link) in network.links().iter().enumerate() {
            topology.connect(EdgeKey::Link(i), link, diag);
        }
        for (i, line) in network.lines().iter().enumerate() {
            topology.connect(EdgeKey::Line(i), line, diag);
        }
        topology
    }

    fn connect<E: Edge>(&mut self, key: EdgeKey, edge: &E, diag: &mut Diagnostics) {
        let from = self.nodes.get(edge.source()).copied();
        let to = self.nodes.get(edge.sink()).copied();
        match (from, to) {
            (Some(a), Some(b)) => {
                self.graph.add_edge(a, b, key);
            }
            _ => {
                let missing = if from.is_none() {
                    edge.source().clone()
                } else {
                    edge.sink().clone()
                };
                let kind = key.kind().as_str();
                warn!(
                    edge = edge.edge_id(),
                    kind,
                    missing = missing.as_str(),
                    "skipping edge with unresolved endpoint"
                );
                diag.add_warning_with_entity(
                    "topology",
                    &format!("edge skipped: bus '{missing}' not found"),
                    &format!("{kind} {}", edge.edge_id()),
                );
                self.skipped.push(SkippedEdge {
                    key,
                    id: edge.edge_id().to_string(),
                    missing,
                });
            }
        }
    }

    pub fn node(&self, bus: &str) -> Option<NodeIndex> {
        self.nodes.get(bus).copied()
    }

    pub fn bus(&self, node: NodeIndex) -> &BusId {
        &self.graph[node]
    }

    /// Resolved edges with their endpoints, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &BusId, &BusId)> {
        self.graph
            .edge_references()
            .map(|e| (*e.weight(), &self.graph[e.source()], &self.graph[e.target()]))
    }

    pub fn edge_key(&self, edge: EdgeIndex) -> Option<EdgeKey> {
        self.graph.edge_weight(edge).copied()
    }

    pub fn skipped(&self) -> &[SkippedEdge] {
        &self.skipped
    }

    pub fn stats(&self) -> TopologyStats {
        let isolated_buses = self
            .graph
            .node_indices()
            .filter(|&n| self.graph.neighbors_undirected(n).next().is_none())
            .count();
        TopologyStats {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            skipped_edges: self.skipped.len(),
            connected_components: connected_components(&self.graph),
            isolated_buses,
        }
    }
}

/// Summary statistics of a [`Topology`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub skipped_edges: usize,
    /// Weakly connected components
    pub connected_components: usize,
    pub isolated_buses: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bus, Line, Link, Network};

    fn network_with_dangling_edge() -> Network {
        let mut network = Network::new();
        for (id, x) in [("A", 0.0), ("B", 1.0), ("C", 2.0), ("D", 3.0)] {
            network.add_bus(Bus::new(id, x, 0.0, "AC")).unwrap();
        }
        network.add_link(Link::new("L1", "A", "B", "DC")).unwrap();
        network.add_link(Link::new("L2", "B", "ghost", "DC")).unwrap();
        network.add_line(Line::new("Line1", "B", "C")).unwrap();
        network
    }

    #[test]
    fn test_dangling_edge_skipped_and_recorded() {
        let mut diag = Diagnostics::new();
        let topology = Topology::build(&network_with_dangling_edge(), &mut diag);

        assert_eq!(topology.graph.edge_count(), 2);
        assert_eq!(topology.skipped().len(), 1);
        assert_eq!(topology.skipped()[0].missing.as_str(), "ghost");
        assert_eq!(topology.skipped()[0].key, EdgeKey::Link(1));

        assert_eq!(diag.warning_count(), 1);
        let issue = diag.issues_by_category("topology").next().unwrap();
        assert_eq!(issue.entity.as_deref(), Some("link L2"));
    }

    #[test]
    fn test_edges_in_insertion_order() {
        let topology = Topology::build(&network_with_dangling_edge(), &mut Diagnostics::new());
        let keys: Vec<_> = topology.edges().map(|(k, _, _)| k).collect();
        assert_eq!(keys, vec![EdgeKey::Link(0), EdgeKey::Line(0)]);
        let (_, from, to) = topology.edges().next().unwrap();
        assert_eq!((from.as_str(), to.as_str()), ("A", "B"));
    }

    #[test]
    fn test_topology_stats() {
        let stats = Topology::build(&network_with_dangling_edge(), &mut Diagnostics::new()).stats();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.edge_count, 2);
        assert_eq!(stats.skipped_edges, 1);
        // {A, B, C} and {D}
        assert_eq!(stats.connected_components, 2);
        assert_eq!(stats.isolated_buses, 1);
    }
}
