//! Bus selections and carrier-keyed result tables.

use crate::{BusId, Carrier};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{HashMap, HashSet};

/// Set of bus identifiers that remembers insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusSet {
    order: Vec<BusId>,
    members: HashSet<BusId>,
}

impl BusSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the bus was already present.
    pub fn insert(&mut self, id: BusId) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.insert(id.clone());
        self.order.push(id);
        true
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BusId> {
        self.order.iter()
    }

    pub fn is_subset(&self, other: &BusSet) -> bool {
        self.members.is_subset(&other.members)
    }
}

impl FromIterator<BusId> for BusSet {
    fn from_iter<I: IntoIterator<Item = BusId>>(iter: I) -> Self {
        let mut set = BusSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> FromIterator<&'a str> for BusSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(BusId::from).collect()
    }
}

impl<'a> IntoIterator for &'a BusSet {
    type Item = &'a BusId;
    type IntoIter = std::slice::Iter<'a, BusId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

/// Carrier → value table with first-seen row order.
///
/// Adding a carrier that is already present accumulates into its row. Zero
/// rows are kept; [`retain_nonzero`](Self::retain_nonzero) drops them for
/// consumers that want a compact table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarrierTable {
    rows: Vec<(Carrier, f64)>,
    index: HashMap<Carrier, usize>,
}

impl CarrierTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, carrier: Carrier, value: f64) {
        match self.index.get(&carrier) {
            Some(&row) => self.rows[row].1 += value,
            None => {
                self.index.insert(carrier.clone(), self.rows.len());
                self.rows.push((carrier, value));
            }
        }
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, carrier: impl Into<Carrier>, value: f64) -> Self {
        self.add(carrier.into(), value);
        self
    }

    pub fn get(&self, carrier: &Carrier) -> Option<f64> {
        self.index.get(carrier).map(|&row| self.rows[row].1)
    }

    /// Value of a carrier, zero when absent.
    pub fn value(&self, carrier: &Carrier) -> f64 {
        self.get(carrier).unwrap_or(0.0)
    }

    pub fn contains(&self, carrier: &Carrier) -> bool {
        self.index.contains_key(carrier)
    }

    pub fn carriers(&self) -> impl Iterator<Item = &Carrier> {
        self.rows.iter().map(|(c, _)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Carrier, f64)> {
        self.rows.iter().map(|(c, v)| (c, *v))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().map(|(_, v)| v).sum()
    }

    /// Add every row of `other`, appending carriers not yet present.
    pub fn merge(&mut self, other: &CarrierTable) {
        for (carrier, value) in other.iter() {
            self.add(carrier.clone(), value);
        }
    }

    /// Keep only the rows whose carrier satisfies `keep`, in order.
    pub fn filtered(&self, keep: impl Fn(&Carrier) -> bool) -> CarrierTable {
        self.iter()
            .filter(|(c, _)| keep(c))
            .map(|(c, v)| (c.clone(), v))
            .collect()
    }

    pub fn retain_nonzero(&mut self) {
        self.rows.retain(|(_, v)| *v != 0.0);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, (c, _))| (c.clone(), i))
            .collect();
    }
}

impl FromIterator<(Carrier, f64)> for CarrierTable {
    fn from_iter<I: IntoIterator<Item = (Carrier, f64)>>(iter: I) -> Self {
        let mut table = CarrierTable::new();
        for (carrier, value) in iter {
            table.add(carrier, value);
        }
        table
    }
}

impl Serialize for CarrierTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rows.len()))?;
        for (carrier, value) in &self.rows {
            map.serialize_entry(carrier.as_str(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates_in_first_seen_order() {
        let mut table = CarrierTable::new();
        table.add(Carrier::Battery, 4.0);
        table.add(Carrier::Solar, 1.0);
        table.add(Carrier::Battery, 6.0);

        let rows: Vec<_> = table.iter().map(|(c, v)| (c.as_str().to_string(), v)).collect();
        assert_eq!(rows, vec![("battery".to_string(), 10.0), ("solar".to_string(), 1.0)]);
        assert_eq!(table.value(&Carrier::Ocgt), 0.0);
        assert_eq!(table.get(&Carrier::Ocgt), None);
    }

    #[test]
    fn test_retain_nonzero_keeps_lookup_consistent() {
        let mut table = CarrierTable::new()
            .with(Carrier::Ac, 0.0)
            .with(Carrier::Solar, 2.0)
            .with(Carrier::Battery, 0.0)
            .with(Carrier::Biomass, 3.0);
        table.retain_nonzero();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&Carrier::Biomass), Some(3.0));
        assert!(!table.contains(&Carrier::Ac));
    }

    #[test]
    fn test_serializes_as_ordered_map() {
        let table = CarrierTable::new()
            .with("solar", 1.5)
            .with("load shedding", 0.0);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"solar":1.5,"load shedding":0.0}"#);
    }

    #[test]
    fn test_bus_set_dedups_and_keeps_order() {
        let set: BusSet = ["C", "A", "C", "B"].into_iter().collect();
        let ids: Vec<_> = set.iter().map(|b| b.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
        assert!(set.contains("A"));

        let small: BusSet = ["A"].into_iter().collect();
        assert!(small.is_subset(&set));
        assert!(!set.is_subset(&small));
    }
}
