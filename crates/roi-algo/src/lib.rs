//! # roi-algo: Region-Restricted Aggregation
//!
//! Turns a network snapshot and a bus selection into carrier-keyed tables.
//!
//! | Component | Output |
//! |-----------|--------|
//! | [`ConnectivityFilter`] | links and lines touching a bus set, optionally by direction |
//! | [`CapacityAggregator`] | optimized capacity per carrier, global and region |
//! | [`FlowAggregator`] | dispatched energy per carrier for electricity, central and decentral heat |
//! | [`TechnologyGroup`] | chart-ready subsets of a capacity table |
//! | [`RegionView`] | buses and edges of the region for a map renderer |
//!
//! All aggregators are constructed from an [`AggregationConfig`] and read the
//! network through [`roi_core::NetworkView`] only.
//!
//! ## Example
//!
//! ```ignore
//! use roi_algo::{AggregationConfig, CapacityAggregator, FlowAggregator, RegionScope};
//! use roi_geo::{RegionConfig, RegionMatcher};
//!
//! let selection = RegionMatcher::new(&RegionConfig::default())
//!     .select(&network, &regions, ["Ingolstadt"])?;
//! let scope = RegionScope::from_selection(&network, &selection);
//!
//! let config = AggregationConfig::default();
//! let capacity = CapacityAggregator::new(&config).aggregate(&scope);
//! let flows = FlowAggregator::new(&config).aggregate(&scope)?;
//! println!("{:.1} MW in region", capacity.region.power().total());
//! ```

pub mod capacity;
pub mod config;
pub mod connectivity;
pub mod flow;
pub mod groups;
pub mod prices;
pub mod scope;
pub mod view;

pub use capacity::{CapacityAggregator, CapacityReport, CapacitySummary};
pub use config::{AggregationConfig, LinkRules};
pub use connectivity::{ConnectivityFilter, Direction, EdgeSelection};
pub use flow::{FlowAggregator, FlowDomain, FlowReport};
pub use groups::TechnologyGroup;
pub use prices::{daily_mean, marginal_price_series, PricePoint};
pub use scope::RegionScope;
pub use view::{RegionView, ViewBus, ViewEdge};
