//! Radial displacement of buses that share a location.
//!
//! Sector-coupled models place the AC, heat and gas buses of one site at the
//! same coordinates. On a map they collapse into one marker; this resolver
//! spreads each coincident group on a small circle so every bus can be picked
//! individually. Only `x`/`y` change, and only for buses in a group.

use roi_core::{Bus, Crs, RoiError, RoiResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::TAU;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JitterConfig {
    /// Displacement radius in metres of `metric_crs`
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Decimal places used when comparing metric coordinates
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    #[serde(default = "default_metric_crs")]
    pub metric_crs: Crs,
}

fn default_radius() -> f64 {
    50.0
}

fn default_decimals() -> u32 {
    1
}

fn default_metric_crs() -> Crs {
    Crs::WebMercator
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            decimals: default_decimals(),
            metric_crs: default_metric_crs(),
        }
    }
}

impl JitterConfig {
    pub fn validate(&self) -> RoiResult<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(RoiError::Config(format!(
                "jitter radius must be positive, got {}",
                self.radius
            )));
        }
        if !self.metric_crs.is_metric() {
            return Err(RoiError::Config(format!(
                "jitter frame {} is not metric",
                self.metric_crs
            )));
        }
        if self.decimals > 9 {
            return Err(RoiError::Config(format!(
                "jitter rounding to {} decimals is finer than coordinate precision",
                self.decimals
            )));
        }
        Ok(())
    }
}

/// `n` points on the circle of `radius` around `center`, member `i` at angle
/// 2πi/n.
pub fn displace(center: (f64, f64), n: usize, radius: f64) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / n as f64;
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DuplicateCoordinateResolver {
    radius: f64,
    scale: f64,
    metric_crs: Crs,
}

impl DuplicateCoordinateResolver {
    pub fn new(config: &JitterConfig) -> RoiResult<Self> {
        config.validate()?;
        Ok(Self {
            radius: config.radius,
            scale: 10f64.powi(config.decimals as i32),
            metric_crs: config.metric_crs,
        })
    }

    fn key(&self, x: f64, y: f64) -> (i64, i64) {
        ((x * self.scale).round() as i64, (y * self.scale).round() as i64)
    }

    /// Return `buses` with every coincident group spread on a circle.
    ///
    /// `crs` is the frame of the input coordinates; output coordinates are in
    /// the same frame and in the same order as the input.
    pub fn resolve(&self, buses: &[Bus], crs: Crs) -> RoiResult<Vec<Bus>> {
        let mut metric = Vec::with_capacity(buses.len());
        for bus in buses {
            metric.push(crs.transform(self.metric_crs, bus.x, bus.y)?);
        }

        // Rounded keys only decide membership; members circle the first one's point.
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut by_key: HashMap<(i64, i64), usize> = HashMap::new();
        for (i, &(x, y)) in metric.iter().enumerate() {
            let key = self.key(x, y);
            match by_key.get(&key) {
                Some(&g) => groups[g].push(i),
                None => {
                    by_key.insert(key, groups.len());
                    groups.push(vec![i]);
                }
            }
        }

        let mut out = buses.to_vec();
        let mut displaced = 0usize;
        for members in groups.iter().filter(|m| m.len() > 1) {
            let center = metric[members[0]];
            let points = displace(center, members.len(), self.radius);
            for (&i, &(mx, my)) in members.iter().zip(&points) {
                let (x, y) = self.metric_crs.transform(crs, mx, my)?;
                out[i].x = x;
                out[i].y = y;
            }
            displaced += members.len();
        }

        debug!(
            buses = buses.len(),
            displaced,
            groups = groups.iter().filter(|m| m.len() > 1).count(),
            "resolved duplicate coordinates"
        );
        Ok(out)
    }

    /// Whether two buses fall into the same coincidence group.
    pub fn coincident(&self, a: &Bus, b: &Bus, crs: Crs) -> RoiResult<bool> {
        let (ax, ay) = crs.transform(self.metric_crs, a.x, a.y)?;
        let (bx, by) = crs.transform(self.metric_crs, b.x, b.y)?;
        Ok(self.key(ax, ay) == self.key(bx, by))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_displace_spacing() {
        let points = displace((0.0, 0.0), 4, 2.0);
        assert!((points[0].0 - 2.0).abs() < 1e-12);
        assert!(points[0].1.abs() < 1e-12);
        assert!(points[1].0.abs() < 1e-12);
        assert!((points[1].1 - 2.0).abs() < 1e-12);
        assert!((points[2].0 + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_config_validation() {
        assert!(JitterConfig::default().validate().is_ok());
        let bad = JitterConfig {
            radius: 0.0,
            ..JitterConfig::default()
        };
        assert!(DuplicateCoordinateResolver::new(&bad).is_err());
        let geographic = JitterConfig {
            metric_crs: Crs::Wgs84,
            ..JitterConfig::default()
        };
        assert!(geographic.validate().is_err());
    }

    #[test]
    fn test_metric_input_is_not_reprojected() {
        let resolver = DuplicateCoordinateResolver::new(&JitterConfig {
            radius: 10.0,
            ..JitterConfig::default()
        })
        .unwrap();
        let buses = vec![
            Bus::new("a", 100.0, 200.0, "AC"),
            Bus::new("b", 100.04, 200.0, "central_heat"),
        ];
        let out = resolver.resolve(&buses, Crs::WebMercator).unwrap();
        assert!((out[0].x - 110.0).abs() < 1e-9);
        assert!((out[0].y - 200.0).abs() < 1e-9);
        assert!((out[1].x - 90.0).abs() < 1e-9);
        assert_eq!(out[1].carrier, buses[1].carrier);
        assert!(resolver.coincident(&buses[0], &buses[1], Crs::WebMercator).unwrap());
    }

    #[test]
    fn test_center_is_shared_coordinate_not_bucket() {
        let resolver = DuplicateCoordinateResolver::new(&JitterConfig::default()).unwrap();
        let buses = vec![
            Bus::new("a", 1000.04, 2000.04, "AC"),
            Bus::new("b", 1000.04, 2000.04, "central_heat"),
        ];
        let out = resolver.resolve(&buses, Crs::WebMercator).unwrap();
        for bus in &out {
            let distance = ((bus.x - 1000.04).powi(2) + (bus.y - 2000.04).powi(2)).sqrt();
            assert!((distance - 50.0).abs() < 1e-9, "distance {distance}");
        }
    }
}
