use crate::connectivity::{ConnectivityFilter, Direction, EdgeSelection};
use roi_core::{Attached, Bus, BusSet, Carrier, Diagnostics, NetworkView};
use roi_geo::BusSelection;

/// A network paired with the bus set of a region of interest.
///
/// Built once per (scenario, region); aggregators only read from it.
#[derive(Debug)]
pub struct RegionScope<'a, N: NetworkView + ?Sized> {
    network: &'a N,
    buses: BusSet,
    filter: ConnectivityFilter,
    diagnostics: Diagnostics,
}

impl<'a, N: NetworkView + ?Sized> RegionScope<'a, N> {
    pub fn new(network: &'a N, buses: BusSet) -> Self {
        let mut diagnostics = Diagnostics::new();
        let filter = ConnectivityFilter::new(network, &mut diagnostics);
        Self {
            network,
            buses,
            filter,
            diagnostics,
        }
    }

    pub fn from_selection(network: &'a N, selection: &BusSelection) -> Self {
        Self::new(network, selection.buses.clone())
    }

    pub fn network(&self) -> &'a N {
        self.network
    }

    pub fn buses(&self) -> &BusSet {
        &self.buses
    }

    /// Issues recorded while resolving edge endpoints.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn edges(&self, direction: Direction) -> EdgeSelection {
        self.filter.select(&self.buses, direction)
    }

    pub fn contains_bus(&self, id: &str) -> bool {
        self.buses.contains(id)
    }

    /// True if `id` is a region bus of the given carrier.
    pub fn is_region_bus_of(&self, id: &str, carrier: &Carrier) -> bool {
        self.contains_bus(id) && self.network.bus(id).is_some_and(|b| &b.carrier == carrier)
    }

    /// Region buses with their attributes, in network order.
    pub fn region_buses(&self) -> impl Iterator<Item = &'a Bus> + '_ {
        self.network
            .buses()
            .iter()
            .filter(move |b| self.buses.contains(b.id.as_str()))
    }

    /// Items of a single-bus collection hosted at a region bus.
    pub fn hosted<'s, A: Attached>(&'s self, items: &'a [A]) -> impl Iterator<Item = &'a A> + 's
    where
        'a: 's,
    {
        items
            .iter()
            .filter(move |item| self.buses.contains(item.host_bus().as_str()))
    }
}
