//! Per-bus marginal price series.

use chrono::{NaiveDate, NaiveDateTime};
use roi_core::{NetworkView, RoiResult, SeriesKind, TimeWindow};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub snapshot: NaiveDateTime,
    /// Currency per MWh
    pub price: f64,
}

/// Marginal price of one bus, optionally limited to a window.
///
/// Fails with `MissingSeries` when the bus has no price column.
pub fn marginal_price_series<N: NetworkView + ?Sized>(
    network: &N,
    bus: &str,
    window: Option<&TimeWindow>,
) -> RoiResult<Vec<PricePoint>> {
    let table = network.series(SeriesKind::BusMarginalPrice);
    let values = table.require(bus)?;
    Ok(table
        .snapshots()
        .iter()
        .zip(values)
        .filter(|(ts, _)| window.map_or(true, |w| w.contains(ts)))
        .map(|(&snapshot, &price)| PricePoint { snapshot, price })
        .collect())
}

/// Mean per calendar day, ascending by date.
pub fn daily_mean(series: &[PricePoint]) -> Vec<(NaiveDate, f64)> {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for point in series {
        let entry = days.entry(point.snapshot.date()).or_insert((0.0, 0));
        entry.0 += point.price;
        entry.1 += 1;
    }
    days.into_iter()
        .map(|(day, (sum, n))| (day, sum / n as f64))
        .collect()
}
