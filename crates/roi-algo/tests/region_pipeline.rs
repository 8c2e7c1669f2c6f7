//! Region matching through capacity aggregation on a three-bus network.

use geo::polygon;
use roi_algo::{AggregationConfig, CapacityAggregator, ConnectivityFilter, Direction, RegionScope};
use roi_core::{Bus, Carrier, Crs, Diagnostics, Link, Megawatts, Network, NetworkView};
use roi_geo::{Region, RegionConfig, RegionMatcher};

fn network() -> Network {
    let mut network = Network::new();
    network.add_bus(Bus::new("A", 0.5, 0.5, "AC")).unwrap();
    network.add_bus(Bus::new("B", 5.0, 5.0, "AC")).unwrap();
    network.add_bus(Bus::new("C", 0.6, 0.4, "central_heat")).unwrap();
    network
        .add_link(Link::new("L1", "A", "C", "heat_pump").extendable(Megawatts(5.0)))
        .unwrap();
    network
        .add_link(Link::new("L2", "B", "A", "AC").with_p_nom(Megawatts(100.0)))
        .unwrap();
    network
}

fn regions() -> Vec<Region> {
    vec![Region::new(
        "R",
        Crs::Wgs84,
        polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)],
    )]
}

#[test]
fn three_bus_region_capacity() {
    let network = network();
    let selection = RegionMatcher::new(&RegionConfig::default())
        .select(&network, &regions(), "R")
        .unwrap();
    let ids: Vec<_> = selection.buses.iter().map(|b| b.as_str()).collect();
    assert_eq!(ids, vec!["A", "C"]);

    let filter = ConnectivityFilter::new(&network, &mut Diagnostics::new());
    let edges = filter.select(&selection.buses, Direction::Any);
    let links: Vec<_> = edges.links_of(&network).map(|l| l.id.as_str()).collect();
    // L2 qualifies through bus1 = A
    assert_eq!(links, vec!["L1", "L2"]);

    let scope = RegionScope::from_selection(&network, &selection);
    let report = CapacityAggregator::new(&AggregationConfig::default()).aggregate(&scope);
    let heat_pump = Carrier::from("heat_pump");
    assert!(!heat_pump.is_known());
    assert_eq!(report.region.combined().value(&heat_pump), 5.0);
    // fixed AC link is not reported
    assert!(!report.region.combined().contains(&Carrier::Ac));
}

#[test]
fn sink_and_source_variants_on_three_bus_network() {
    let network = network();
    let selection = RegionMatcher::default()
        .select(&network, &regions(), "r")
        .unwrap();
    let filter = ConnectivityFilter::new(&network, &mut Diagnostics::new());

    let sink = filter.select(&selection.buses, Direction::Sink);
    let source = filter.select(&selection.buses, Direction::Source);
    assert_eq!(sink.links, vec![0, 1]);
    assert_eq!(source.links, vec![0]);
    assert_eq!(network.links()[source.links[0]].id.as_str(), "L1");
}

#[test]
fn region_bus_set_is_subset_of_network() {
    let network = network();
    let selection = RegionMatcher::default()
        .select(&network, &regions(), "R")
        .unwrap();
    let all = network.buses().iter().map(|b| b.id.clone()).collect();
    assert!(selection.buses.is_subset(&all));
}
