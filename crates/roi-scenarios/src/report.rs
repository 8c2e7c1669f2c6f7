use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::job::{AnalysisKind, ScenarioRecord};
use crate::merge::ScenarioTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub created_at: DateTime<Utc>,
    /// Region name fragments the comparison was run for
    pub fragments: Vec<String>,
    /// Column order shared by every table
    pub labels: Vec<String>,
    pub tables: BTreeMap<AnalysisKind, ScenarioTable>,
    pub scenarios: Vec<ScenarioRecord>,
}

impl ComparisonReport {
    pub fn table(&self, kind: AnalysisKind) -> Option<&ScenarioTable> {
        self.tables.get(&kind)
    }

    /// One CSV per table under `dir`, named by [`AnalysisKind::file_name`].
    pub fn write_tables(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating table directory '{}'", dir.display()))?;
        let mut written = Vec::with_capacity(self.tables.len());
        for (kind, table) in &self.tables {
            let path = dir.join(kind.file_name());
            table.write_csv(&path)?;
            written.push(path);
        }
        Ok(written)
    }
}

pub fn write_report(path: &Path, report: &ComparisonReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory '{}'", parent.display()))?;
    }
    let json =
        serde_json::to_string_pretty(report).context("serializing comparison report to JSON")?;
    fs::write(path, json)
        .with_context(|| format!("writing comparison report '{}'", path.display()))?;
    Ok(())
}

pub fn load_report(path: &Path) -> Result<ComparisonReport> {
    let file = fs::File::open(path)
        .with_context(|| format!("opening comparison report '{}'", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("parsing comparison report '{}'", path.display()))
}
