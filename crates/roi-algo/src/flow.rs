//! Dispatched energy by carrier for the three supply domains of a region.
//!
//! Sign conventions follow the optimizer output: link `p1` is negative when
//! the link delivers energy to its sink bus, generator `p` is positive when
//! producing, storage-unit `p` is positive when discharging, and line `p0` is
//! negative when power flows from bus1 towards bus0.
//!
//! Per domain, restricted to region components:
//!
//! - **electricity**: links ending at an AC bus (`-Σp1`), generators at AC
//!   buses (`Σp`), storage units (`Σ max(p, 0)` as `battery_discharge`) and
//!   lines touching the region (`-Σ min(p0, 0)` as `import`)
//! - **central heat** / **decentral heat**: links ending at a `central_heat`
//!   / `rural_heat` bus (`-Σp1`) and generators at those buses (`Σp`)
//!
//! Charging is never netted against `battery_discharge`, and `import` counts
//! every line touching the region, including lines with both ends inside.

use crate::config::LinkRules;
use crate::connectivity::Direction;
use crate::scope::RegionScope;
use crate::AggregationConfig;
use roi_core::{Carrier, CarrierTable, Generator, Link, NetworkView, RoiResult, SeriesKind, TimeWindow};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDomain {
    Electricity,
    CentralHeat,
    DecentralHeat,
}

impl FlowDomain {
    pub const ALL: [FlowDomain; 3] = [
        FlowDomain::Electricity,
        FlowDomain::CentralHeat,
        FlowDomain::DecentralHeat,
    ];

    /// Carrier of the buses that receive the domain's energy.
    pub fn sink_carrier(&self) -> Carrier {
        match self {
            FlowDomain::Electricity => Carrier::Ac,
            FlowDomain::CentralHeat => Carrier::CentralHeat,
            FlowDomain::DecentralHeat => Carrier::RuralHeat,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowDomain::Electricity => "electricity",
            FlowDomain::CentralHeat => "central_heat",
            FlowDomain::DecentralHeat => "decentral_heat",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowReport {
    pub electricity: CarrierTable,
    pub central_heat: CarrierTable,
    pub decentral_heat: CarrierTable,
}

impl FlowReport {
    pub fn domain(&self, domain: FlowDomain) -> &CarrierTable {
        match domain {
            FlowDomain::Electricity => &self.electricity,
            FlowDomain::CentralHeat => &self.central_heat,
            FlowDomain::DecentralHeat => &self.decentral_heat,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlowAggregator {
    rules: LinkRules,
    window: Option<TimeWindow>,
    extendable_only: bool,
}

impl FlowAggregator {
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            rules: config.link_rules.clone(),
            window: config.window,
            extendable_only: config.extendable_only,
        }
    }

    fn counts_link(&self, link: &Link, domain: FlowDomain) -> bool {
        let gated = !self.extendable_only || self.rules.is_reportable(link);
        match domain {
            FlowDomain::Electricity => gated && !self.rules.is_excluded(&link.carrier),
            FlowDomain::CentralHeat | FlowDomain::DecentralHeat => gated,
        }
    }

    fn counts_generator(&self, generator: &Generator) -> bool {
        (!self.extendable_only || generator.p_nom_extendable)
            && !generator.carrier.is_load_shedding()
    }

    /// Links and generators delivering into the domain's region buses.
    fn supply<N: NetworkView + ?Sized>(
        &self,
        scope: &RegionScope<'_, N>,
        domain: FlowDomain,
        table: &mut CarrierTable,
    ) -> RoiResult<()> {
        let network = scope.network();
        let sink_carrier = domain.sink_carrier();
        let window = self.window.as_ref();

        let p1 = network.series(SeriesKind::LinkP1);
        let edges = scope.edges(Direction::Sink);
        for link in edges.links_of(network) {
            if !scope.is_region_bus_of(link.bus1.as_str(), &sink_carrier)
                || !self.counts_link(link, domain)
            {
                continue;
            }
            let delivered = -p1.sum(link.id.as_str(), window)?;
            table.add(link.carrier.clone(), delivered);
        }

        let p = network.series(SeriesKind::GeneratorP);
        for generator in scope.hosted(network.generators()) {
            if !scope.is_region_bus_of(generator.bus.as_str(), &sink_carrier)
                || !self.counts_generator(generator)
            {
                continue;
            }
            let produced = p.sum(generator.id.as_str(), window)?;
            table.add(generator.carrier.clone(), produced);
        }
        Ok(())
    }

    pub fn electricity<N: NetworkView + ?Sized>(
        &self,
        scope: &RegionScope<'_, N>,
    ) -> RoiResult<CarrierTable> {
        let network = scope.network();
        let window = self.window.as_ref();
        let mut table = CarrierTable::new();
        self.supply(scope, FlowDomain::Electricity, &mut table)?;

        let storage_p = network.series(SeriesKind::StorageUnitP);
        let mut discharge = 0.0;
        for unit in scope.hosted(network.storage_units()) {
            discharge += storage_p.sum_where(unit.id.as_str(), window, |v| v > 0.0)?;
        }
        table.add(Carrier::BatteryDischarge, discharge);

        let line_p0 = network.series(SeriesKind::LineP0);
        let mut import = 0.0;
        for line in scope.edges(Direction::Any).lines_of(network) {
            import -= line_p0.sum_where(line.id.as_str(), window, |v| v < 0.0)?;
        }
        table.add(Carrier::Import, import);

        Ok(table)
    }

    pub fn heat<N: NetworkView + ?Sized>(
        &self,
        scope: &RegionScope<'_, N>,
        domain: FlowDomain,
    ) -> RoiResult<CarrierTable> {
        let mut table = CarrierTable::new();
        self.supply(scope, domain, &mut table)?;
        Ok(table)
    }

    pub fn domain<N: NetworkView + ?Sized>(
        &self,
        scope: &RegionScope<'_, N>,
        domain: FlowDomain,
    ) -> RoiResult<CarrierTable> {
        match domain {
            FlowDomain::Electricity => self.electricity(scope),
            FlowDomain::CentralHeat | FlowDomain::DecentralHeat => self.heat(scope, domain),
        }
    }

    pub fn aggregate<N: NetworkView + ?Sized>(
        &self,
        scope: &RegionScope<'_, N>,
    ) -> RoiResult<FlowReport> {
        let report = FlowReport {
            electricity: self.electricity(scope)?,
            central_heat: self.heat(scope, FlowDomain::CentralHeat)?,
            decentral_heat: self.heat(scope, FlowDomain::DecentralHeat)?,
        };
        debug!(
            electricity_mwh = report.electricity.total(),
            central_heat_mwh = report.central_heat.total(),
            decentral_heat_mwh = report.decentral_heat.total(),
            "aggregated flows"
        );
        Ok(report)
    }
}
