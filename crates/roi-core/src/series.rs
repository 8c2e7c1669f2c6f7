//! Time-indexed dispatch tables keyed by component identifier.
//!
//! Each table has one snapshot axis and one column per component. Missing
//! columns are not an absent-means-zero case: the optimizer writes a column for
//! every dispatched component, so a missing one means the snapshot is
//! incomplete and the aggregation reading it fails with
//! [`RoiError::MissingSeries`].

use crate::{RoiError, RoiResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The per-timestep tables a network snapshot carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Link power at the source bus
    LinkP0,
    /// Link power at the sink bus
    LinkP1,
    /// Line flow measured at bus0
    LineP0,
    GeneratorP,
    StorageUnitP,
    BusMarginalPrice,
}

impl SeriesKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesKind::LinkP0 => "links_t.p0",
            SeriesKind::LinkP1 => "links_t.p1",
            SeriesKind::LineP0 => "lines_t.p0",
            SeriesKind::GeneratorP => "generators_t.p",
            SeriesKind::StorageUnitP => "storage_units_t.p",
            SeriesKind::BusMarginalPrice => "buses_t.marginal_price",
        }
    }
}

/// Inclusive range of snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> RoiResult<Self> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    pub fn validate(&self) -> RoiResult<()> {
        if self.start > self.end {
            return Err(RoiError::Config(format!(
                "time window starts ({}) after it ends ({})",
                self.start, self.end
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, snapshot: &NaiveDateTime) -> bool {
        *snapshot >= self.start && *snapshot <= self.end
    }
}

#[derive(Debug, Clone)]
pub struct SeriesTable {
    kind: SeriesKind,
    snapshots: Vec<NaiveDateTime>,
    columns: HashMap<String, Vec<f64>>,
}

impl SeriesTable {
    pub fn new(kind: SeriesKind, snapshots: Vec<NaiveDateTime>) -> Self {
        Self {
            kind,
            snapshots,
            columns: HashMap::new(),
        }
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn snapshots(&self) -> &[NaiveDateTime] {
        &self.snapshots
    }

    /// Number of components with a column.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Add a column; its length must match the snapshot axis.
    pub fn insert(&mut self, component: impl Into<String>, values: Vec<f64>) -> RoiResult<()> {
        let component = component.into();
        if values.len() != self.snapshots.len() {
            return Err(RoiError::Validation(format!(
                "{}: column '{}' has {} values for {} snapshots",
                self.kind.as_str(),
                component,
                values.len(),
                self.snapshots.len()
            )));
        }
        self.columns.insert(component, values);
        Ok(())
    }

    pub fn with_column(mut self, component: impl Into<String>, values: Vec<f64>) -> RoiResult<Self> {
        self.insert(component, values)?;
        Ok(self)
    }

    pub fn column(&self, component: &str) -> Option<&[f64]> {
        self.columns.get(component).map(Vec::as_slice)
    }

    pub fn contains(&self, component: &str) -> bool {
        self.columns.contains_key(component)
    }

    /// Like [`column`](Self::column) but a missing column is an error.
    pub fn require(&self, component: &str) -> RoiResult<&[f64]> {
        self.column(component)
            .ok_or_else(|| RoiError::MissingSeries {
                table: self.kind.as_str().to_string(),
                component: component.to_string(),
            })
    }

    /// Sum the values of one column that fall inside `window` (all snapshots
    /// when `None`) and satisfy `keep`.
    pub fn sum_where(
        &self,
        component: &str,
        window: Option<&TimeWindow>,
        keep: impl Fn(f64) -> bool,
    ) -> RoiResult<f64> {
        let values = self.require(component)?;
        Ok(self
            .snapshots
            .iter()
            .zip(values)
            .filter(|(ts, _)| window.map_or(true, |w| w.contains(ts)))
            .map(|(_, v)| *v)
            .filter(|v| keep(*v))
            .sum())
    }

    pub fn sum(&self, component: &str, window: Option<&TimeWindow>) -> RoiResult<f64> {
        self.sum_where(component, window, |_| true)
    }
}

/// All per-timestep tables of one network snapshot.
#[derive(Debug, Clone)]
pub struct NetworkSeries {
    pub links_p0: SeriesTable,
    pub links_p1: SeriesTable,
    pub lines_p0: SeriesTable,
    pub generators_p: SeriesTable,
    pub storage_units_p: SeriesTable,
    pub buses_marginal_price: SeriesTable,
}

impl NetworkSeries {
    /// Empty tables sharing one snapshot axis.
    pub fn with_snapshots(snapshots: Vec<NaiveDateTime>) -> Self {
        let table = |kind| SeriesTable::new(kind, snapshots.clone());
        Self {
            links_p0: table(SeriesKind::LinkP0),
            links_p1: table(SeriesKind::LinkP1),
            lines_p0: table(SeriesKind::LineP0),
            generators_p: table(SeriesKind::GeneratorP),
            storage_units_p: table(SeriesKind::StorageUnitP),
            buses_marginal_price: table(SeriesKind::BusMarginalPrice),
        }
    }

    pub fn get(&self, kind: SeriesKind) -> &SeriesTable {
        match kind {
            SeriesKind::LinkP0 => &self.links_p0,
            SeriesKind::LinkP1 => &self.links_p1,
            SeriesKind::LineP0 => &self.lines_p0,
            SeriesKind::GeneratorP => &self.generators_p,
            SeriesKind::StorageUnitP => &self.storage_units_p,
            SeriesKind::BusMarginalPrice => &self.buses_marginal_price,
        }
    }

    pub fn get_mut(&mut self, kind: SeriesKind) -> &mut SeriesTable {
        match kind {
            SeriesKind::LinkP0 => &mut self.links_p0,
            SeriesKind::LinkP1 => &mut self.links_p1,
            SeriesKind::LineP0 => &mut self.lines_p0,
            SeriesKind::GeneratorP => &mut self.generators_p,
            SeriesKind::StorageUnitP => &mut self.storage_units_p,
            SeriesKind::BusMarginalPrice => &mut self.buses_marginal_price,
        }
    }
}

impl Default for NetworkSeries {
    fn default() -> Self {
        Self::with_snapshots(Vec::new())
    }
}
