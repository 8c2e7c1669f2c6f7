//! Coordinate reference frames for bus coordinates and region geometry.
//!
//! Bus coordinates arrive in one declared frame per network, region polygons in
//! their own. Containment tests happen in the region's frame and coordinate
//! de-duplication in a metric one, so the core needs exact forward and inverse
//! transforms between the frames it supports:
//!
//! ```text
//! Geographic (EPSG:4326)  ⇄  Spherical Mercator (EPSG:3857)
//!   lon/lat degrees            x/y metres
//! ```
//!
//! Both directions are closed-form, so a round trip is lossless up to
//! floating-point rounding.

use crate::{RoiError, RoiResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;
use std::str::FromStr;

/// WGS84 semi-major axis used by spherical Mercator (metres)
const EARTH_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of the Mercator square (degrees)
pub const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Supported reference frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Crs {
    /// Geographic lon/lat in degrees
    #[default]
    Wgs84,
    /// Spherical (web) Mercator in metres; distance-preserving enough for jitter
    WebMercator,
}

impl Crs {
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::WebMercator => 3857,
        }
    }

    /// True if coordinate units are metres.
    pub fn is_metric(&self) -> bool {
        matches!(self, Crs::WebMercator)
    }

    /// Convert a point from `self` into `to`.
    pub fn transform(&self, to: Crs, x: f64, y: f64) -> RoiResult<(f64, f64)> {
        match (self, to) {
            (Crs::Wgs84, Crs::Wgs84) | (Crs::WebMercator, Crs::WebMercator) => Ok((x, y)),
            (Crs::Wgs84, Crs::WebMercator) => lonlat_to_mercator(x, y),
            (Crs::WebMercator, Crs::Wgs84) => mercator_to_lonlat(x, y),
        }
    }
}

fn lonlat_to_mercator(lon: f64, lat: f64) -> RoiResult<(f64, f64)> {
    if !lon.is_finite() || !lat.is_finite() {
        return Err(RoiError::Projection(format!(
            "non-finite coordinate ({lon}, {lat})"
        )));
    }
    if lat.abs() > MERCATOR_MAX_LATITUDE {
        return Err(RoiError::Projection(format!(
            "latitude {lat} outside the Mercator domain (±{MERCATOR_MAX_LATITUDE})"
        )));
    }
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
    Ok((x, y))
}

fn mercator_to_lonlat(x: f64, y: f64) -> RoiResult<(f64, f64)> {
    if !x.is_finite() || !y.is_finite() {
        return Err(RoiError::Projection(format!(
            "non-finite coordinate ({x}, {y})"
        )));
    }
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - FRAC_PI_2).to_degrees();
    Ok((lon, lat))
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for Crs {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s
            .trim()
            .to_ascii_uppercase()
            .trim_start_matches("EPSG:")
            .to_string();
        match code.as_str() {
            "4326" => Ok(Crs::Wgs84),
            "3857" | "900913" => Ok(Crs::WebMercator),
            _ => Err(RoiError::Config(format!(
                "unsupported reference frame '{s}'; use EPSG:4326 or EPSG:3857"
            ))),
        }
    }
}

impl TryFrom<String> for Crs {
    type Error = RoiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self {
        crs.to_string()
    }
}
