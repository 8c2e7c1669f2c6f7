use serde::{Deserialize, Serialize};

/// Merged tables produced by one comparison run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisKind {
    GlobalCapacity,
    RegionCapacity,
    RegionStorageInterfaces,
    Electricity,
    CentralHeat,
    DecentralHeat,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 6] = [
        AnalysisKind::GlobalCapacity,
        AnalysisKind::RegionCapacity,
        AnalysisKind::RegionStorageInterfaces,
        AnalysisKind::Electricity,
        AnalysisKind::CentralHeat,
        AnalysisKind::DecentralHeat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::GlobalCapacity => "global-capacity",
            AnalysisKind::RegionCapacity => "region-capacity",
            AnalysisKind::RegionStorageInterfaces => "region-storage-interfaces",
            AnalysisKind::Electricity => "electricity",
            AnalysisKind::CentralHeat => "central-heat",
            AnalysisKind::DecentralHeat => "decentral-heat",
        }
    }

    /// File name used when the table is written next to the report.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.as_str())
    }
}

/// What one scenario contributed to the comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub label: String,
    /// Names of the matched regions
    pub regions: Vec<String>,
    pub region_buses: usize,
    pub skipped_edges: usize,
    pub warnings: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_serde() {
        for kind in AnalysisKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.as_str());
        }
        assert_eq!(AnalysisKind::CentralHeat.file_name(), "central-heat.csv");
    }
}
