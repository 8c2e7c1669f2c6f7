//! Optimized capacity by carrier.
//!
//! Four component sources feed one table per scope:
//!
//! | Source        | Included when                                   | Unit |
//! |---------------|-------------------------------------------------|------|
//! | links         | extendable or reportable-fixed, not excluded    | MW   |
//! | generators    | extendable, not load shedding                   | MW   |
//! | storage units | always                                          | MW   |
//! | stores        | energy-extendable                               | MWh  |
//!
//! Each source keeps its own table so MW and MWh stay separable;
//! [`CapacitySummary::combined`] flattens them into the single carrier-keyed
//! column used for comparisons. The region scope restricts links to those
//! touching a region bus and the other sources to those hosted at one.

use crate::config::LinkRules;
use crate::connectivity::Direction;
use crate::scope::RegionScope;
use crate::AggregationConfig;
use roi_core::{
    CapacityUnit, Carrier, CarrierTable, Generator, Link, NetworkView, StorageUnit, Store,
};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CapacitySummary {
    pub links: CarrierTable,
    pub generators: CarrierTable,
    pub storage_units: CarrierTable,
    pub stores: CarrierTable,
    /// Excluded charger/discharger links, reported on their own
    pub storage_interfaces: CarrierTable,
}

impl CapacitySummary {
    /// Links, generators, storage units and stores in one column.
    pub fn combined(&self) -> CarrierTable {
        let mut table = self.power();
        table.merge(&self.stores);
        table
    }

    pub fn power(&self) -> CarrierTable {
        let mut table = self.links.clone();
        table.merge(&self.generators);
        table.merge(&self.storage_units);
        table
    }

    pub fn energy(&self) -> CarrierTable {
        self.stores.clone()
    }

    /// Unit of a carrier's row in [`combined`](Self::combined). A carrier
    /// present both as store and as power component reports `None`.
    pub fn unit_of(&self, carrier: &Carrier) -> Option<CapacityUnit> {
        let power = self.power().contains(carrier);
        let energy = self.stores.contains(carrier);
        match (power, energy) {
            (true, false) => Some(CapacityUnit::Power),
            (false, true) => Some(CapacityUnit::Energy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CapacityReport {
    pub global: CapacitySummary,
    pub region: CapacitySummary,
}

#[derive(Debug, Clone)]
pub struct CapacityAggregator {
    rules: LinkRules,
}

impl CapacityAggregator {
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            rules: config.link_rules.clone(),
        }
    }

    fn summarize<'l, 'g, 'u, 's>(
        &self,
        links: impl Iterator<Item = &'l Link>,
        generators: impl Iterator<Item = &'g Generator>,
        storage_units: impl Iterator<Item = &'u StorageUnit>,
        stores: impl Iterator<Item = &'s Store>,
    ) -> CapacitySummary {
        let mut summary = CapacitySummary::default();

        for link in links {
            if self.rules.admits(link) {
                summary.links.add(link.carrier.clone(), link.p_nom_opt.value());
            } else if self.rules.is_excluded(&link.carrier) {
                summary
                    .storage_interfaces
                    .add(link.carrier.clone(), link.p_nom_opt.value());
            }
        }
        for generator in generators {
            if generator.p_nom_extendable && !generator.carrier.is_load_shedding() {
                summary
                    .generators
                    .add(generator.carrier.clone(), generator.p_nom_opt.value());
            }
        }
        for unit in storage_units {
            summary.storage_units.add(unit.carrier.clone(), unit.p_nom_opt.value());
        }
        for store in stores {
            if store.e_nom_extendable {
                summary.stores.add(store.carrier.clone(), store.e_nom_opt.value());
            }
        }
        summary
    }

    /// Capacity of the whole network.
    pub fn global<N: NetworkView + ?Sized>(&self, network: &N) -> CapacitySummary {
        self.summarize(
            network.links().iter(),
            network.generators().iter(),
            network.storage_units().iter(),
            network.stores().iter(),
        )
    }

    /// Capacity restricted to the region of `scope`.
    pub fn region<N: NetworkView + ?Sized>(&self, scope: &RegionScope<'_, N>) -> CapacitySummary {
        let network = scope.network();
        let edges = scope.edges(Direction::Any);
        self.summarize(
            edges.links_of(network),
            scope.hosted(network.generators()),
            scope.hosted(network.storage_units()),
            scope.hosted(network.stores()),
        )
    }

    pub fn aggregate<N: NetworkView + ?Sized>(&self, scope: &RegionScope<'_, N>) -> CapacityReport {
        let report = CapacityReport {
            global: self.global(scope.network()),
            region: self.region(scope),
        };
        debug!(
            global_mw = report.global.power().total(),
            region_mw = report.region.power().total(),
            region_mwh = report.region.energy().total(),
            "aggregated capacity"
        );
        report
    }
}
