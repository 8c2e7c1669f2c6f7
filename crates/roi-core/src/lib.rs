//! # roi-core: Multi-Carrier Network Snapshot Model
//!
//! Provides the static data model consumed by region extraction and
//! scenario aggregation: buses, links, lines, generators, storage units and
//! stores of one already-optimized network, plus its per-timestep dispatch
//! tables.
//!
//! ## Design Philosophy
//!
//! A [`Network`] is an immutable snapshot. Components live in plain vectors in
//! load order (aggregation output follows that order), with a hash index on
//! bus identifiers for endpoint resolution. Algorithms never touch the
//! concrete type; they consume the read-only [`NetworkView`] capability so a
//! loader can expose its own storage without copying.
//!
//! ## Quick Start
//!
//! ```rust
//! use roi_core::*;
//!
//! let mut network = Network::new();
//! network.add_bus(Bus::new("A", 11.42, 48.76, "AC")).unwrap();
//! network.add_bus(Bus::new("C", 11.43, 48.77, "central_heat")).unwrap();
//! network
//!     .add_link(Link::new("L1", "A", "C", "central_heat_pump").extendable(Megawatts(5.0)))
//!     .unwrap();
//!
//! assert_eq!(network.stats().num_links, 1);
//! assert_eq!(network.bus("C").unwrap().carrier, Carrier::CentralHeat);
//! ```
//!
//! ## Modules
//!
//! - [`carrier`] - Closed set of technology tags
//! - [`crs`] - Reference frames and exact transforms
//! - [`diagnostics`] - Auditable issue collection
//! - [`series`] - Per-timestep dispatch tables
//! - [`table`] - Bus sets and carrier-keyed result tables
//! - [`topology`] - Directed bus graph with dangling-edge filtering
//! - [`units`] - MW / MWh newtypes

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;

pub mod carrier;
pub mod crs;
pub mod diagnostics;
pub mod error;
pub mod series;
pub mod table;
pub mod topology;
pub mod units;

pub use carrier::Carrier;
pub use crs::Crs;
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{RoiError, RoiResult};
pub use series::{NetworkSeries, SeriesKind, SeriesTable, TimeWindow};
pub use table::{BusSet, CarrierTable};
pub use topology::{EdgeKey, EdgeKind, Topology, TopologyStats};
pub use units::{CapacityUnit, MegawattHours, Megawatts, PerUnit};

macro_rules! string_id {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(String);

            impl $name {
                #[inline]
                pub fn new(value: impl Into<String>) -> Self {
                    $name(value.into())
                }
                #[inline]
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    $name(value.to_string())
                }
            }

            impl From<String> for $name {
                fn from(value: String) -> Self {
                    $name(value)
                }
            }

            impl Borrow<str> for $name {
                fn borrow(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )+
    };
}

string_id! {
    BusId,
    LinkId,
    LineId,
    GeneratorId,
    StorageUnitId,
    StoreId,
}

/// A node where energy of one carrier is balanced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub id: BusId,
    /// Planar coordinates in the owning network's [`Crs`]
    pub x: f64,
    pub y: f64,
    pub carrier: Carrier,
}

impl Bus {
    pub fn new(id: impl Into<BusId>, x: f64, y: f64, carrier: impl Into<Carrier>) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            carrier: carrier.into(),
        }
    }
}

/// Directed conversion or transport edge, possibly between carriers.
///
/// `p0` is measured at `bus0` and `p1` at `bus1`; by convention they have
/// opposite signs, so energy delivered to `bus1` shows up as negative `p1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub bus0: BusId,
    pub bus1: BusId,
    pub carrier: Carrier,
    pub p_nom: Megawatts,
    pub p_nom_opt: Megawatts,
    pub p_nom_extendable: bool,
}

impl Link {
    pub fn new(
        id: impl Into<LinkId>,
        bus0: impl Into<BusId>,
        bus1: impl Into<BusId>,
        carrier: impl Into<Carrier>,
    ) -> Self {
        Self {
            id: id.into(),
            bus0: bus0.into(),
            bus1: bus1.into(),
            carrier: carrier.into(),
            p_nom: Megawatts::ZERO,
            p_nom_opt: Megawatts::ZERO,
            p_nom_extendable: false,
        }
    }

    /// Mark the link as optimized with the given result capacity.
    pub fn extendable(mut self, p_nom_opt: Megawatts) -> Self {
        self.p_nom_extendable = true;
        self.p_nom_opt = p_nom_opt;
        self
    }

    /// Fixed capacity: `p_nom_opt` equals `p_nom`.
    pub fn with_p_nom(mut self, p_nom: Megawatts) -> Self {
        self.p_nom = p_nom;
        self.p_nom_opt = p_nom;
        self
    }

    pub fn with_p_nom_opt(mut self, p_nom_opt: Megawatts) -> Self {
        self.p_nom_opt = p_nom_opt;
        self
    }
}

/// Undirected AC transmission edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub bus0: BusId,
    pub bus1: BusId,
    pub s_max_pu: PerUnit,
}

impl Line {
    pub fn new(id: impl Into<LineId>, bus0: impl Into<BusId>, bus1: impl Into<BusId>) -> Self {
        Self {
            id: id.into(),
            bus0: bus0.into(),
            bus1: bus1.into(),
            s_max_pu: PerUnit::ONE,
        }
    }

    pub fn with_s_max_pu(mut self, s_max_pu: PerUnit) -> Self {
        self.s_max_pu = s_max_pu;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub id: GeneratorId,
    pub bus: BusId,
    pub carrier: Carrier,
    pub p_nom_extendable: bool,
    pub p_nom_opt: Megawatts,
}

impl Generator {
    pub fn new(id: impl Into<GeneratorId>, bus: impl Into<BusId>, carrier: impl Into<Carrier>) -> Self {
        Self {
            id: id.into(),
            bus: bus.into(),
            carrier: carrier.into(),
            p_nom_extendable: false,
            p_nom_opt: Megawatts::ZERO,
        }
    }

    pub fn extendable(mut self, p_nom_opt: Megawatts) -> Self {
        self.p_nom_extendable = true;
        self.p_nom_opt = p_nom_opt;
        self
    }

    pub fn with_p_nom_opt(mut self, p_nom_opt: Megawatts) -> Self {
        self.p_nom_opt = p_nom_opt;
        self
    }
}

/// Power-rated storage (batteries, pumped hydro).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageUnit {
    pub id: StorageUnitId,
    pub bus: BusId,
    pub carrier: Carrier,
    pub p_nom_extendable: bool,
    pub p_nom_opt: Megawatts,
}

impl StorageUnit {
    pub fn new(
        id: impl Into<StorageUnitId>,
        bus: impl Into<BusId>,
        carrier: impl Into<Carrier>,
        p_nom_opt: Megawatts,
    ) -> Self {
        Self {
            id: id.into(),
            bus: bus.into(),
            carrier: carrier.into(),
            p_nom_extendable: false,
            p_nom_opt,
        }
    }

    pub fn extendable(mut self) -> Self {
        self.p_nom_extendable = true;
        self
    }
}

/// Energy-rated storage (heat tanks, hydrogen caverns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub bus: BusId,
    pub carrier: Carrier,
    pub e_nom_extendable: bool,
    pub e_nom_opt: MegawattHours,
}

impl Store {
    pub fn new(id: impl Into<StoreId>, bus: impl Into<BusId>, carrier: impl Into<Carrier>) -> Self {
        Self {
            id: id.into(),
            bus: bus.into(),
            carrier: carrier.into(),
            e_nom_extendable: false,
            e_nom_opt: MegawattHours::ZERO,
        }
    }

    pub fn extendable(mut self, e_nom_opt: MegawattHours) -> Self {
        self.e_nom_extendable = true;
        self.e_nom_opt = e_nom_opt;
        self
    }
}

/// A component connecting two buses.
pub trait Edge {
    fn edge_id(&self) -> &str;
    fn source(&self) -> &BusId;
    fn sink(&self) -> &BusId;
}

impl Edge for Link {
    fn edge_id(&self) -> &str {
        self.id.as_str()
    }
    fn source(&self) -> &BusId {
        &self.bus0
    }
    fn sink(&self) -> &BusId {
        &self.bus1
    }
}

impl Edge for Line {
    fn edge_id(&self) -> &str {
        self.id.as_str()
    }
    fn source(&self) -> &BusId {
        &self.bus0
    }
    fn sink(&self) -> &BusId {
        &self.bus1
    }
}

/// A component hosted at a single bus.
pub trait Attached {
    fn component_id(&self) -> &str;
    fn host_bus(&self) -> &BusId;
}

macro_rules! impl_attached {
    ($($type:ty),+) => {
        $(
            impl Attached for $type {
                fn component_id(&self) -> &str {
                    self.id.as_str()
                }
                fn host_bus(&self) -> &BusId {
                    &self.bus
                }
            }
        )+
    };
}

impl_attached!(Generator, StorageUnit, Store);

/// Read-only access to a network snapshot.
///
/// Every aggregator takes `&impl NetworkView`; nothing in the workspace
/// needs mutable access after loading.
pub trait NetworkView {
    /// Reference frame of bus coordinates
    fn crs(&self) -> Crs;
    fn buses(&self) -> &[Bus];
    fn bus(&self, id: &str) -> Option<&Bus>;
    fn links(&self) -> &[Link];
    fn lines(&self) -> &[Line];
    fn generators(&self) -> &[Generator];
    fn storage_units(&self) -> &[StorageUnit];
    fn stores(&self) -> &[Store];
    fn series(&self, kind: SeriesKind) -> &SeriesTable;
}

/// In-memory network snapshot.
#[derive(Debug, Clone, Default)]
pub struct Network {
    crs: Crs,
    buses: Vec<Bus>,
    bus_index: HashMap<BusId, usize>,
    links: Vec<Link>,
    lines: Vec<Line>,
    generators: Vec<Generator>,
    storage_units: Vec<StorageUnit>,
    stores: Vec<Store>,
    component_ids: HashSet<(&'static str, String)>,
    series: NetworkSeries,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    pub fn add_bus(&mut self, bus: Bus) -> RoiResult<()> {
        if self.bus_index.contains_key(&bus.id) {
            return Err(RoiError::Network(format!("duplicate bus id '{}'", bus.id)));
        }
        self.bus_index.insert(bus.id.clone(), self.buses.len());
        self.buses.push(bus);
        Ok(())
    }

    fn claim_id(&mut self, kind: &'static str, id: &str) -> RoiResult<()> {
        if !self.component_ids.insert((kind, id.to_string())) {
            return Err(RoiError::Network(format!("duplicate {kind} id '{id}'")));
        }
        Ok(())
    }

    pub fn add_link(&mut self, link: Link) -> RoiResult<()> {
        self.claim_id("link", link.id.as_str())?;
        self.links.push(link);
        Ok(())
    }

    pub fn add_line(&mut self, line: Line) -> RoiResult<()> {
        self.claim_id("line", line.id.as_str())?;
        self.lines.push(line);
        Ok(())
    }

    pub fn add_generator(&mut self, generator: Generator) -> RoiResult<()> {
        self.claim_id("generator", generator.id.as_str())?;
        self.generators.push(generator);
        Ok(())
    }

    pub fn add_storage_unit(&mut self, unit: StorageUnit) -> RoiResult<()> {
        self.claim_id("storage unit", unit.id.as_str())?;
        self.storage_units.push(unit);
        Ok(())
    }

    pub fn add_store(&mut self, store: Store) -> RoiResult<()> {
        self.claim_id("store", store.id.as_str())?;
        self.stores.push(store);
        Ok(())
    }

    pub fn set_series(&mut self, series: NetworkSeries) {
        self.series = series;
    }

    pub fn series_mut(&mut self) -> &mut NetworkSeries {
        &mut self.series
    }

    /// Compute basic statistics about the network
    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            num_buses: self.buses.len(),
            num_links: self.links.len(),
            num_lines: self.lines.len(),
            num_generators: self.generators.len(),
            num_storage_units: self.storage_units.len(),
            num_stores: self.stores.len(),
            num_snapshots: self.series.links_p0.snapshots().len(),
            total_link_p_nom_opt_mw: self.links.iter().map(|l| l.p_nom_opt.value()).sum(),
            total_store_e_nom_opt_mwh: self.stores.iter().map(|s| s.e_nom_opt.value()).sum(),
        }
    }

    /// Report data-integrity issues without changing anything.
    ///
    /// Dangling bus references are errors here; the aggregators still
    /// tolerate dangling edge endpoints by skipping the edge.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        let stats = self.stats();

        if stats.num_buses == 0 {
            diag.add_error("structure", "Network has no buses");
            return;
        }

        for bus in &self.buses {
            if !bus.x.is_finite() || !bus.y.is_finite() {
                diag.add_warning_with_entity(
                    "geometry",
                    &format!("non-finite coordinates ({}, {})", bus.x, bus.y),
                    &format!("bus {}", bus.id),
                );
            }
            if !bus.carrier.is_known() {
                diag.add_warning_with_entity(
                    "carrier",
                    &format!("unknown carrier '{}'", bus.carrier),
                    &format!("bus {}", bus.id),
                );
            }
        }

        self.check_edges("link", &self.links, diag);
        self.check_edges("line", &self.lines, diag);
        self.check_attached("generator", &self.generators, diag);
        self.check_attached("storage unit", &self.storage_units, diag);
        self.check_attached("store", &self.stores, diag);

        if stats.num_links + stats.num_lines == 0 && stats.num_buses > 1 {
            diag.add_warning("structure", "Network has multiple buses but no links or lines");
        }
    }

    fn check_edges<E: Edge>(&self, kind: &str, edges: &[E], diag: &mut Diagnostics) {
        for edge in edges {
            for (end, bus) in [("bus0", edge.source()), ("bus1", edge.sink())] {
                if !self.bus_index.contains_key(bus) {
                    diag.add_error_with_entity(
                        "reference",
                        &format!("{end} '{bus}' not found"),
                        &format!("{kind} {}", edge.edge_id()),
                    );
                }
            }
        }
    }

    fn check_attached<A: Attached>(&self, kind: &str, items: &[A], diag: &mut Diagnostics) {
        for item in items {
            let bus = item.host_bus();
            if !self.bus_index.contains_key(bus) {
                diag.add_error_with_entity(
                    "reference",
                    &format!("bus '{bus}' not found"),
                    &format!("{kind} {}", item.component_id()),
                );
            }
        }
    }
}

impl NetworkView for Network {
    fn crs(&self) -> Crs {
        self.crs
    }
    fn buses(&self) -> &[Bus] {
        &self.buses
    }
    fn bus(&self, id: &str) -> Option<&Bus> {
        self.bus_index.get(id).map(|&i| &self.buses[i])
    }
    fn links(&self) -> &[Link] {
        &self.links
    }
    fn lines(&self) -> &[Line] {
        &self.lines
    }
    fn generators(&self) -> &[Generator] {
        &self.generators
    }
    fn storage_units(&self) -> &[StorageUnit] {
        &self.storage_units
    }
    fn stores(&self) -> &[Store] {
        &self.stores
    }
    fn series(&self, kind: SeriesKind) -> &SeriesTable {
        self.series.get(kind)
    }
}

/// Statistics about a network's size and capacity
#[derive(Debug, Clone, Default)]
pub struct NetworkStats {
    pub num_buses: usize,
    pub num_links: usize,
    pub num_lines: usize,
    pub num_generators: usize,
    pub num_storage_units: usize,
    pub num_stores: usize,
    pub num_snapshots: usize,
    pub total_link_p_nom_opt_mw: f64,
    pub total_store_e_nom_opt_mwh: f64,
}

impl fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} buses, {} links ({:.0} MW), {} lines, {} generators, {} storage units, {} stores ({:.0} MWh), {} snapshots",
            self.num_buses,
            self.num_links,
            self.total_link_p_nom_opt_mw,
            self.num_lines,
            self.num_generators,
            self.num_storage_units,
            self.num_stores,
            self.total_store_e_nom_opt_mwh,
            self.num_snapshots
        )
    }
}
