pub mod job;
pub mod merge;
pub mod report;
pub mod runner;
pub mod spec;

pub use job::{AnalysisKind, ScenarioRecord};
pub use merge::{ScenarioMerger, ScenarioTable};
pub use report::{load_report, write_report, ComparisonReport};
pub use runner::{run_comparison, run_scenario, Scenario, ScenarioResult};
pub use spec::{load_config_from_path, validate, AnalysisConfig, ScenarioSettings};
