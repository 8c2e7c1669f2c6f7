use roi_core::{Carrier, Link, RoiResult, TimeWindow};
use serde::{Deserialize, Serialize};

/// Which links count toward capacity and flow totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRules {
    /// Non-extendable carriers that are still reported (waste-heat cogeneration)
    #[serde(default = "default_reportable_fixed")]
    pub reportable_fixed: Vec<Carrier>,
    /// Carriers never counted; their capacity mirrors a store's
    #[serde(default = "default_excluded")]
    pub excluded: Vec<Carrier>,
}

fn default_reportable_fixed() -> Vec<Carrier> {
    vec![Carrier::CentralWasteChp, Carrier::CentralWasteChpHeat]
}

fn default_excluded() -> Vec<Carrier> {
    Carrier::KNOWN
        .iter()
        .filter(|c| c.is_storage_interface())
        .cloned()
        .collect()
}

impl Default for LinkRules {
    fn default() -> Self {
        Self {
            reportable_fixed: default_reportable_fixed(),
            excluded: default_excluded(),
        }
    }
}

impl LinkRules {
    pub fn is_excluded(&self, carrier: &Carrier) -> bool {
        self.excluded.contains(carrier)
    }

    /// Extendable, or fixed but on the reportable list. Ignores exclusions.
    pub fn is_reportable(&self, link: &Link) -> bool {
        link.p_nom_extendable || self.reportable_fixed.contains(&link.carrier)
    }

    /// Counted toward capacity totals.
    pub fn admits(&self, link: &Link) -> bool {
        self.is_reportable(link) && !self.is_excluded(&link.carrier)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default)]
    pub link_rules: LinkRules,
    /// Restrict flow totals to this snapshot range
    #[serde(default)]
    pub window: Option<TimeWindow>,
    /// Only extendable links and generators contribute to flow totals
    #[serde(default = "default_extendable_only")]
    pub extendable_only: bool,
}

fn default_extendable_only() -> bool {
    true
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            link_rules: LinkRules::default(),
            window: None,
            extendable_only: default_extendable_only(),
        }
    }
}

impl AggregationConfig {
    pub fn validate(&self) -> RoiResult<()> {
        if let Some(window) = &self.window {
            window.validate()?;
        }
        Ok(())
    }
}
