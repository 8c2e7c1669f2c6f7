//! Links and lines induced by a bus set.
//!
//! Endpoints are resolved once, when the filter is built from the network
//! topology. Edges with an unresolved endpoint never enter the topology, so
//! they are absent from every selection and are recorded in the diagnostics
//! passed to [`ConnectivityFilter::new`].

use roi_core::{BusSet, Diagnostics, EdgeKey, Line, Link, NetworkView, Topology};
use serde::{Deserialize, Serialize};

/// Which endpoint must lie in the bus set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// bus0 or bus1
    #[default]
    Any,
    /// bus1 (flow arriving at the set)
    Sink,
    /// bus0 (flow leaving the set)
    Source,
}

/// Positions of selected edges in the network's link and line collections,
/// ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSelection {
    pub links: Vec<usize>,
    pub lines: Vec<usize>,
}

impl EdgeSelection {
    pub fn len(&self) -> usize {
        self.links.len() + self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.lines.is_empty()
    }

    pub fn links_of<'s, 'n: 's, N: NetworkView + ?Sized>(
        &'s self,
        network: &'n N,
    ) -> impl Iterator<Item = &'n Link> + 's {
        self.links.iter().map(move |&i| &network.links()[i])
    }

    pub fn lines_of<'s, 'n: 's, N: NetworkView + ?Sized>(
        &'s self,
        network: &'n N,
    ) -> impl Iterator<Item = &'n Line> + 's {
        self.lines.iter().map(move |&i| &network.lines()[i])
    }
}

#[derive(Debug, Clone)]
pub struct ConnectivityFilter {
    topology: Topology,
}

impl ConnectivityFilter {
    pub fn new<N: NetworkView + ?Sized>(network: &N, diag: &mut Diagnostics) -> Self {
        Self {
            topology: Topology::build(network, diag),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn select(&self, buses: &BusSet, direction: Direction) -> EdgeSelection {
        let mut selection = EdgeSelection::default();
        for (key, bus0, bus1) in self.topology.edges() {
            let hit = match direction {
                Direction::Any => buses.contains(bus0.as_str()) || buses.contains(bus1.as_str()),
                Direction::Sink => buses.contains(bus1.as_str()),
                Direction::Source => buses.contains(bus0.as_str()),
            };
            if hit {
                match key {
                    EdgeKey::Link(i) => selection.links.push(i),
                    EdgeKey::Line(i) => selection.lines.push(i),
                }
            }
        }
        selection
    }
}
