//! Unified error type for region extraction and scenario aggregation.
//!
//! Every crate in the workspace returns [`RoiError`] from its library API.
//! File-facing helpers in `roi-scenarios` use `anyhow` and never convert into
//! this type.
//!
//! # Example
//!
//! ```ignore
//! use roi_core::{RoiError, RoiResult};
//!
//! fn region_capacity(network: &Network, fragments: &[&str]) -> RoiResult<CarrierTable> {
//!     let selection = matcher.select(network, &regions, fragments)?;
//!     let report = aggregator.aggregate(&RegionScope::new(network, selection))?;
//!     Ok(report.region.combined())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all region-of-interest operations.
#[derive(Error, Debug)]
pub enum RoiError {
    /// No region name contains any of the requested fragments.
    #[error("no region matches any of the name fragments {fragments:?}")]
    RegionNotFound { fragments: Vec<String> },

    /// Scenario label count disagrees with the number of tables to merge.
    #[error("got {labels} scenario labels for {tables} tables")]
    LabelCountMismatch { labels: usize, tables: usize },

    /// A component selected for aggregation has no column in a time-series table.
    #[error("time series '{table}' has no column for component '{component}'")]
    MissingSeries { table: String, component: String },

    /// Coordinate conversion between reference frames failed.
    #[error("Projection error: {0}")]
    Projection(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network structure errors
    #[error("Network error: {0}")]
    Network(String),

    /// A per-scenario run failed; carries the scenario label.
    #[error("scenario '{label}': {source}")]
    Scenario {
        label: String,
        #[source]
        source: Box<RoiError>,
    },

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Failure outside the data model, such as the scenario worker pool
    /// not starting.
    #[error("{0}")]
    Other(String),
}

impl RoiError {
    /// Wrap this error with the label of the scenario it came from.
    pub fn in_scenario(self, label: impl Into<String>) -> Self {
        RoiError::Scenario {
            label: label.into(),
            source: Box::new(self),
        }
    }
}

/// Convenience type alias for Results using RoiError.
pub type RoiResult<T> = Result<T, RoiError>;
