//! Side-by-side comparison of per-scenario carrier tables.

use anyhow::{Context, Result};
use roi_core::{Carrier, CarrierTable, RoiError, RoiResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Carriers as rows, scenarios as columns.
///
/// Rows appear in the order a carrier is first seen while walking the input
/// tables in label order. A carrier missing from a scenario is recorded as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTable {
    pub carriers: Vec<Carrier>,
    pub scenarios: Vec<String>,
    /// `values[row][column]`
    pub values: Vec<Vec<f64>>,
}

impl ScenarioTable {
    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    fn column_index(&self, label: &str) -> Option<usize> {
        self.scenarios.iter().position(|s| s == label)
    }

    fn row_index(&self, carrier: &Carrier) -> Option<usize> {
        self.carriers.iter().position(|c| c == carrier)
    }

    /// One scenario's column, zero-filled rows included.
    pub fn column(&self, label: &str) -> Option<CarrierTable> {
        let col = self.column_index(label)?;
        Some(
            self.carriers
                .iter()
                .zip(&self.values)
                .map(|(carrier, row)| (carrier.clone(), row[col]))
                .collect(),
        )
    }

    pub fn row(&self, carrier: &Carrier) -> Option<&[f64]> {
        self.row_index(carrier).map(|i| self.values[i].as_slice())
    }

    pub fn value(&self, carrier: &Carrier, label: &str) -> Option<f64> {
        Some(self.values[self.row_index(carrier)?][self.column_index(label)?])
    }

    /// Column sums in scenario order.
    pub fn totals(&self) -> Vec<f64> {
        (0..self.scenarios.len())
            .map(|col| self.values.iter().map(|row| row[col]).sum())
            .collect()
    }

    /// Header `carrier,<label>...`, then one record per carrier.
    pub fn to_csv_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        let mut header = vec!["carrier".to_string()];
        header.extend(self.scenarios.iter().cloned());
        writer.write_record(&header)?;
        for (carrier, row) in self.carriers.iter().zip(&self.values) {
            let mut record = vec![carrier.as_str().to_string()];
            record.extend(row.iter().map(|v| v.to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
        let file = fs::File::create(path)
            .with_context(|| format!("creating comparison table {}", path.display()))?;
        self.to_csv_writer(file)
            .with_context(|| format!("writing comparison table {}", path.display()))
    }
}

/// Outer-joins per-scenario carrier tables on the carrier key.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioMerger;

impl ScenarioMerger {
    /// `labels[i]` names the column built from `tables[i]`.
    ///
    /// Fails with `LabelCountMismatch` when the two lengths differ and with
    /// `Validation` when a label repeats.
    pub fn merge<S: AsRef<str>>(labels: &[S], tables: &[CarrierTable]) -> RoiResult<ScenarioTable> {
        if labels.len() != tables.len() {
            return Err(RoiError::LabelCountMismatch {
                labels: labels.len(),
                tables: tables.len(),
            });
        }
        let mut seen = HashSet::new();
        for label in labels {
            if !seen.insert(label.as_ref()) {
                return Err(RoiError::Validation(format!(
                    "duplicate scenario label '{}'",
                    label.as_ref()
                )));
            }
        }

        let width = tables.len();
        let mut rows: HashMap<Carrier, usize> = HashMap::new();
        let mut carriers = Vec::new();
        let mut values: Vec<Vec<f64>> = Vec::new();
        for (col, table) in tables.iter().enumerate() {
            for (carrier, value) in table.iter() {
                let row = *rows.entry(carrier.clone()).or_insert_with(|| {
                    carriers.push(carrier.clone());
                    values.push(vec![0.0; width]);
                    values.len() - 1
                });
                values[row][col] += value;
            }
        }

        Ok(ScenarioTable {
            carriers,
            scenarios: labels.iter().map(|l| l.as_ref().to_string()).collect(),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_carrier_fills_zero() {
        let tables = [CarrierTable::new().with("battery", 10.0), CarrierTable::new()];
        let merged = ScenarioMerger::merge(&["s1", "s2"], &tables).unwrap();
        assert_eq!(merged.carriers, vec![Carrier::Battery]);
        assert_eq!(merged.scenarios, vec!["s1", "s2"]);
        assert_eq!(merged.values, vec![vec![10.0, 0.0]]);
    }

    #[test]
    fn test_rows_in_first_seen_order() {
        let tables = [
            CarrierTable::new().with("solar", 1.0).with("OCGT", 2.0),
            CarrierTable::new().with("wind_onshore", 3.0).with("solar", 4.0),
        ];
        let merged = ScenarioMerger::merge(&["a", "b"], &tables).unwrap();
        let rows: Vec<_> = merged.carriers.iter().map(|c| c.as_str()).collect();
        assert_eq!(rows, vec!["solar", "OCGT", "wind_onshore"]);
        assert_eq!(merged.row(&Carrier::Solar), Some(&[1.0, 4.0][..]));
        assert_eq!(merged.value(&Carrier::Ocgt, "b"), Some(0.0));
        assert_eq!(merged.totals(), vec![3.0, 7.0]);
    }

    #[test]
    fn test_label_count_mismatch() {
        let tables = [CarrierTable::new()];
        let err = ScenarioMerger::merge(&["a", "b"], &tables).unwrap_err();
        assert!(matches!(err, RoiError::LabelCountMismatch { labels: 2, tables: 1 }));
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let tables = [CarrierTable::new(), CarrierTable::new()];
        let err = ScenarioMerger::merge(&["a", "a"], &tables).unwrap_err();
        assert!(matches!(err, RoiError::Validation(_)));
    }

    #[test]
    fn test_empty_merge() {
        let labels: [&str; 0] = [];
        let merged = ScenarioMerger::merge(&labels, &[]).unwrap();
        assert!(merged.is_empty());
        assert!(merged.scenarios.is_empty());
    }

    #[test]
    fn test_csv_layout() {
        let tables = [
            CarrierTable::new().with("battery", 10.0),
            CarrierTable::new().with("battery", 2.5),
        ];
        let merged = ScenarioMerger::merge(&["s1", "s2"], &tables).unwrap();
        let mut out = Vec::new();
        merged.to_csv_writer(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "carrier,s1,s2\nbattery,10,2.5\n");
    }
}
