pub mod jitter;
pub mod region;

pub use jitter::{displace, DuplicateCoordinateResolver, JitterConfig};
pub use region::{BoundaryPolicy, BusSelection, Region, RegionConfig, RegionMatcher, RegionQuery};
