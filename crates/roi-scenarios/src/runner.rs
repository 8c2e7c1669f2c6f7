use crate::job::{AnalysisKind, ScenarioRecord};
use crate::merge::ScenarioMerger;
use crate::report::ComparisonReport;
use crate::spec::AnalysisConfig;
use chrono::Utc;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use roi_algo::{
    CapacityAggregator, CapacityReport, FlowAggregator, FlowReport, RegionScope, RegionView,
};
use roi_core::{CarrierTable, NetworkView, RoiError, RoiResult};
use roi_geo::{DuplicateCoordinateResolver, Region, RegionMatcher};
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};

/// A labelled optimization result.
#[derive(Debug, Clone)]
pub struct Scenario<N> {
    pub label: String,
    pub network: N,
}

impl<N> Scenario<N> {
    pub fn new(label: impl Into<String>, network: N) -> Self {
        Self {
            label: label.into(),
            network,
        }
    }
}

/// Everything computed for one scenario before merging.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub record: ScenarioRecord,
    pub capacity: CapacityReport,
    pub flows: FlowReport,
    pub view: RegionView,
}

impl ScenarioResult {
    pub fn table(&self, kind: AnalysisKind) -> CarrierTable {
        match kind {
            AnalysisKind::GlobalCapacity => self.capacity.global.combined(),
            AnalysisKind::RegionCapacity => self.capacity.region.combined(),
            AnalysisKind::RegionStorageInterfaces => self.capacity.region.storage_interfaces.clone(),
            AnalysisKind::Electricity => self.flows.electricity.clone(),
            AnalysisKind::CentralHeat => self.flows.central_heat.clone(),
            AnalysisKind::DecentralHeat => self.flows.decentral_heat.clone(),
        }
    }
}

/// Region selection, capacity and flow aggregation for one scenario.
///
/// Errors are tagged with the scenario label.
pub fn run_scenario<N: NetworkView>(
    scenario: &Scenario<N>,
    regions: &[Region],
    config: &AnalysisConfig,
) -> RoiResult<ScenarioResult> {
    let label = scenario.label.as_str();
    let runner = || -> RoiResult<ScenarioResult> {
        let network = &scenario.network;
        let selection = RegionMatcher::new(&config.region).select(
            network,
            regions,
            config.region.fragments.as_slice(),
        )?;
        let scope = RegionScope::from_selection(network, &selection);

        let capacity = CapacityAggregator::new(&config.aggregation).aggregate(&scope);
        let flows = FlowAggregator::new(&config.aggregation).aggregate(&scope)?;

        let resolver = config
            .jitter
            .as_ref()
            .map(DuplicateCoordinateResolver::new)
            .transpose()?;
        let view = RegionView::build(&scope, resolver.as_ref())?;

        let diagnostics = scope.diagnostics();
        for issue in diagnostics.warnings() {
            warn!(scenario = label, "{issue}");
        }
        let record = ScenarioRecord {
            label: label.to_string(),
            regions: selection.regions.clone(),
            region_buses: selection.len(),
            skipped_edges: diagnostics.issues_by_category("topology").count(),
            warnings: diagnostics.warning_count(),
        };
        Ok(ScenarioResult {
            record,
            capacity,
            flows,
            view,
        })
    };
    runner().map_err(|err| err.in_scenario(label))
}

/// Positions of `scenarios` in the configured column order.
fn column_order<N>(scenarios: &[Scenario<N>], config: &AnalysisConfig) -> RoiResult<Vec<usize>> {
    let mut seen = HashSet::new();
    for scenario in scenarios {
        if scenario.label.trim().is_empty() {
            return Err(RoiError::Config("scenario label cannot be empty".into()));
        }
        if !seen.insert(scenario.label.as_str()) {
            return Err(RoiError::Config(format!(
                "duplicate scenario label '{}'",
                scenario.label
            )));
        }
    }

    let labels = &config.scenarios.labels;
    if labels.is_empty() {
        return Ok((0..scenarios.len()).collect());
    }
    if labels.len() != scenarios.len() {
        return Err(RoiError::LabelCountMismatch {
            labels: labels.len(),
            tables: scenarios.len(),
        });
    }
    labels
        .iter()
        .map(|label| {
            scenarios
                .iter()
                .position(|s| &s.label == label)
                .ok_or_else(|| RoiError::Config(format!("no scenario labelled '{label}'")))
        })
        .collect()
}

/// Runs every scenario against the same region and merges the results.
///
/// Scenarios are processed in parallel on a dedicated pool. The first
/// failing scenario in column order aborts the comparison.
pub fn run_comparison<N: NetworkView + Sync>(
    scenarios: &[Scenario<N>],
    regions: &[Region],
    config: &AnalysisConfig,
) -> RoiResult<ComparisonReport> {
    if scenarios.is_empty() {
        return Err(RoiError::Config("comparison needs at least one scenario".into()));
    }
    config.region.validate()?;
    config.aggregation.validate()?;
    let order = column_order(scenarios, config)?;

    let thread_count = if config.scenarios.threads == 0 {
        num_cpus::get()
    } else {
        config.scenarios.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .map_err(|err| RoiError::Other(format!("building scenario thread pool: {err}")))?;

    info!(
        scenarios = scenarios.len(),
        threads = thread_count,
        fragments = ?config.region.fragments,
        "comparing scenarios"
    );

    let outcomes: Vec<RoiResult<ScenarioResult>> = pool.install(|| {
        order
            .par_iter()
            .map(|&i| run_scenario(&scenarios[i], regions, config))
            .collect()
    });
    let results = outcomes.into_iter().collect::<RoiResult<Vec<_>>>()?;

    let labels: Vec<String> = results.iter().map(|r| r.record.label.clone()).collect();
    let mut tables = BTreeMap::new();
    for kind in AnalysisKind::ALL {
        let columns: Vec<CarrierTable> = results.iter().map(|r| r.table(kind)).collect();
        tables.insert(kind, ScenarioMerger::merge(&labels, &columns)?);
    }

    Ok(ComparisonReport {
        created_at: Utc::now(),
        fragments: config.region.fragments.clone(),
        labels,
        tables,
        scenarios: results.into_iter().map(|r| r.record).collect(),
    })
}
