use anyhow::{anyhow, Context, Result};
use roi_algo::AggregationConfig;
use roi_geo::{JitterConfig, RegionConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One comparison run: which region, how to aggregate, which scenarios.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub region: RegionConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    /// Spread coincident buses in region views; views keep raw coordinates when unset
    #[serde(default)]
    pub jitter: Option<JitterConfig>,
    #[serde(default)]
    pub scenarios: ScenarioSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSettings {
    /// Column order of the merged tables; empty keeps the order scenarios are passed in
    #[serde(default)]
    pub labels: Vec<String>,
    /// Worker threads, 0 for one per CPU
    #[serde(default)]
    pub threads: usize,
}

pub fn load_config_from_path(path: &Path) -> Result<AnalysisConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading analysis config '{}'", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing analysis config yaml")
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing analysis config json")
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .context("parsing analysis config"),
    }
}

pub fn validate(config: &AnalysisConfig) -> Result<()> {
    config.region.validate().context("region")?;
    config.aggregation.validate().context("aggregation")?;
    if let Some(jitter) = &config.jitter {
        jitter.validate().context("jitter")?;
    }
    let mut seen = HashSet::new();
    for label in &config.scenarios.labels {
        if label.trim().is_empty() {
            return Err(anyhow!("scenario label cannot be empty"));
        }
        if !seen.insert(label.as_str()) {
            return Err(anyhow!("duplicate scenario label '{}' in config", label));
        }
    }
    Ok(())
}
