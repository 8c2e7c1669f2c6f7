//! Region buses and edges in the shape a map renderer consumes.

use crate::connectivity::Direction;
use crate::scope::RegionScope;
use roi_core::{Bus, BusId, Carrier, Crs, NetworkView, RoiResult};
use roi_geo::DuplicateCoordinateResolver;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewBus {
    pub id: BusId,
    pub x: f64,
    pub y: f64,
    pub carrier: Carrier,
}

impl From<Bus> for ViewBus {
    fn from(bus: Bus) -> Self {
        Self {
            id: bus.id,
            x: bus.x,
            y: bus.y,
            carrier: bus.carrier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEdge {
    pub id: String,
    pub bus0: BusId,
    pub bus1: BusId,
    /// Links only; lines are always AC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<Carrier>,
    /// `p_nom_opt` in MW for links, `s_max_pu` for lines
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionView {
    pub crs: Crs,
    /// Whether coincident buses were spread out
    pub jittered: bool,
    pub buses: Vec<ViewBus>,
    pub links: Vec<ViewEdge>,
    pub lines: Vec<ViewEdge>,
}

impl RegionView {
    pub fn build<N: NetworkView + ?Sized>(
        scope: &RegionScope<'_, N>,
        resolver: Option<&DuplicateCoordinateResolver>,
    ) -> RoiResult<Self> {
        let network = scope.network();
        let crs = network.crs();

        let region: Vec<Bus> = scope.region_buses().cloned().collect();
        let buses = match resolver {
            Some(resolver) => resolver.resolve(&region, crs)?,
            None => region,
        };

        let edges = scope.edges(Direction::Any);
        let links = edges
            .links_of(network)
            .map(|l| ViewEdge {
                id: l.id.to_string(),
                bus0: l.bus0.clone(),
                bus1: l.bus1.clone(),
                carrier: Some(l.carrier.clone()),
                weight: l.p_nom_opt.value(),
            })
            .collect();
        let lines = edges
            .lines_of(network)
            .map(|l| ViewEdge {
                id: l.id.to_string(),
                bus0: l.bus0.clone(),
                bus1: l.bus1.clone(),
                carrier: None,
                weight: l.s_max_pu.value(),
            })
            .collect();

        Ok(Self {
            crs,
            jittered: resolver.is_some(),
            buses: buses.into_iter().map(ViewBus::from).collect(),
            links,
            lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roi_core::{BusSet, Line, Link, Megawatts, Network, PerUnit};
    use roi_geo::JitterConfig;

    fn network() -> Network {
        let mut n = Network::new();
        n.add_bus(Bus::new("ac", 11.4, 48.7, "AC")).unwrap();
        n.add_bus(Bus::new("heat", 11.4, 48.7, "central_heat")).unwrap();
        n.add_bus(Bus::new("far", 13.4, 52.5, "AC")).unwrap();
        n.add_link(Link::new("hp", "ac", "heat", "central_heat_pump").extendable(Megawatts(8.0))).unwrap();
        n.add_line(Line::new("tie", "far", "ac").with_s_max_pu(PerUnit(0.7))).unwrap();
        n
    }

    #[test]
    fn test_view_carries_edges_and_weights() {
        let network = network();
        let scope = RegionScope::new(&network, ["ac", "heat"].into_iter().collect::<BusSet>());
        let view = RegionView::build(&scope, None).unwrap();

        assert!(!view.jittered);
        assert_eq!(view.buses.len(), 2);
        assert_eq!(view.links[0].weight, 8.0);
        assert_eq!(view.links[0].carrier, Some(Carrier::CentralHeatPump));
        assert_eq!(view.lines[0].bus0.as_str(), "far");
        assert_eq!(view.lines[0].weight, 0.7);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["crs"], "EPSG:4326");
        assert!(json["lines"][0].get("carrier").is_none());
    }

    #[test]
    fn test_view_with_jitter_separates_site_buses() {
        let network = network();
        let scope = RegionScope::new(&network, ["ac", "heat"].into_iter().collect::<BusSet>());
        let resolver = DuplicateCoordinateResolver::new(&JitterConfig::default()).unwrap();
        let view = RegionView::build(&scope, Some(&resolver)).unwrap();

        assert!(view.jittered);
        assert_ne!((view.buses[0].x, view.buses[0].y), (view.buses[1].x, view.buses[1].y));
        assert_eq!(view.buses[1].carrier, Carrier::CentralHeat);
    }
}
