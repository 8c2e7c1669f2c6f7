//! Named region polygons and the bus selection they induce.
//!
//! A query is a list of name fragments. Every region whose name contains a
//! fragment (case-insensitive substring) is part of the area of interest, and
//! the matched polygons are unioned before buses are tested against them.
//! Containment happens in the frame of the first matched region; other
//! regions and the bus coordinates are converted into it first.

use geo::{Area, BooleanOps, Contains, Coord, Intersects, LineString, MapCoords, MultiPolygon, Point, Polygon};
use geojson::{Feature, Value};
use roi_core::{Bus, BusSet, Crs, NetworkView, RoiError, RoiResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How a bus lying exactly on a region outline is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Interior only; a point on the outline is outside
    #[default]
    Exclusive,
    /// Interior or outline
    Inclusive,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Name fragments of the area of interest
    #[serde(default)]
    pub fragments: Vec<String>,
    #[serde(default)]
    pub boundary: BoundaryPolicy,
}

impl RegionConfig {
    pub fn validate(&self) -> RoiResult<()> {
        RegionQuery::from(self.fragments.clone()).normalized().map(|_| ())
    }
}

/// A named polygon area.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub crs: Crs,
    pub geometry: Option<MultiPolygon<f64>>,
}

impl Region {
    pub fn new(name: impl Into<String>, crs: Crs, geometry: impl Into<MultiPolygon<f64>>) -> Self {
        Self {
            name: name.into(),
            crs,
            geometry: Some(geometry.into()),
        }
    }

    pub fn without_geometry(name: impl Into<String>, crs: Crs) -> Self {
        Self {
            name: name.into(),
            crs,
            geometry: None,
        }
    }

    /// Convert a parsed GeoJSON feature, reading the region name from the
    /// string property `name_property`.
    ///
    /// Polygon and MultiPolygon geometries are kept. Any other geometry kind,
    /// or none at all, yields a region without geometry.
    pub fn from_feature(feature: &Feature, name_property: &str, crs: Crs) -> RoiResult<Self> {
        let name = feature
            .property(name_property)
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                RoiError::Parse(format!(
                    "feature has no string property '{name_property}'"
                ))
            })?;

        let geometry = feature.geometry.as_ref().and_then(|g| match &g.value {
            Value::Polygon(rings) => Some(MultiPolygon::new(vec![polygon(rings)])),
            Value::MultiPolygon(polygons) => Some(MultiPolygon::new(
                polygons.iter().map(|rings| polygon(rings)).collect(),
            )),
            _ => None,
        });

        Ok(Self {
            name: name.to_string(),
            crs,
            geometry,
        })
    }

    /// True when there is geometry with a non-zero area.
    pub fn has_area(&self) -> bool {
        self.geometry
            .as_ref()
            .is_some_and(|g| !g.0.is_empty() && g.unsigned_area() > 0.0)
    }

    /// Geometry converted into `to`; `None` if the region has none.
    pub fn geometry_in(&self, to: Crs) -> RoiResult<Option<MultiPolygon<f64>>> {
        let from = self.crs;
        self.geometry
            .as_ref()
            .map(|g| {
                g.try_map_coords(move |c| {
                    from.transform(to, c.x, c.y).map(|(x, y)| Coord { x, y })
                })
            })
            .transpose()
    }
}

fn ring(positions: &[Vec<f64>]) -> LineString<f64> {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| Coord { x: p[0], y: p[1] })
        .collect()
}

fn polygon(rings: &[Vec<Vec<f64>>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|r| ring(r));
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}

/// Region name fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionQuery {
    fragments: Vec<String>,
}

impl RegionQuery {
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Lowercased non-blank fragments; an error if none remain.
    pub fn normalized(&self) -> RoiResult<Vec<String>> {
        let fragments: Vec<String> = self
            .fragments
            .iter()
            .filter(|f| !f.trim().is_empty())
            .map(|f| f.to_lowercase())
            .collect();
        if fragments.is_empty() {
            return Err(RoiError::Config(
                "region query needs at least one non-blank name fragment".into(),
            ));
        }
        Ok(fragments)
    }
}

impl From<&str> for RegionQuery {
    fn from(fragment: &str) -> Self {
        Self {
            fragments: vec![fragment.to_string()],
        }
    }
}

impl From<String> for RegionQuery {
    fn from(fragment: String) -> Self {
        Self {
            fragments: vec![fragment],
        }
    }
}

impl From<Vec<String>> for RegionQuery {
    fn from(fragments: Vec<String>) -> Self {
        Self { fragments }
    }
}

impl From<&[String]> for RegionQuery {
    fn from(fragments: &[String]) -> Self {
        Self {
            fragments: fragments.to_vec(),
        }
    }
}

impl From<&[&str]> for RegionQuery {
    fn from(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for RegionQuery {
    fn from(fragments: [&str; N]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Buses inside the unioned area of interest.
#[derive(Debug, Clone)]
pub struct BusSelection {
    /// Names of the matched regions in input order
    pub regions: Vec<String>,
    /// Frame of `area`
    pub crs: Crs,
    pub area: MultiPolygon<f64>,
    pub buses: BusSet,
}

impl BusSelection {
    pub fn contains(&self, bus: &str) -> bool {
        self.buses.contains(bus)
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    /// Selected buses with all their attributes, in network order.
    pub fn resolve<'a, N: NetworkView + ?Sized>(&self, network: &'a N) -> Vec<&'a Bus> {
        network
            .buses()
            .iter()
            .filter(|b| self.buses.contains(b.id.as_str()))
            .collect()
    }
}

/// Resolves name fragments to a unioned area and tests bus containment.
#[derive(Debug, Clone, Default)]
pub struct RegionMatcher {
    boundary: BoundaryPolicy,
}

impl RegionMatcher {
    pub fn new(config: &RegionConfig) -> Self {
        Self {
            boundary: config.boundary,
        }
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    /// Regions whose name contains any fragment, in input order.
    ///
    /// Fails with `RegionNotFound` only when no name matches; regions without
    /// area are still returned here and dropped by [`select`](Self::select).
    pub fn matching<'r>(
        &self,
        regions: &'r [Region],
        query: &RegionQuery,
    ) -> RoiResult<Vec<&'r Region>> {
        let fragments = query.normalized()?;
        let matched: Vec<&Region> = regions
            .iter()
            .filter(|r| {
                let name = r.name.to_lowercase();
                fragments.iter().any(|f| name.contains(f.as_str()))
            })
            .collect();
        if matched.is_empty() {
            return Err(RoiError::RegionNotFound {
                fragments: query.fragments().to_vec(),
            });
        }
        Ok(matched)
    }

    /// Union of the matched geometries in the frame of the first one.
    pub fn union(&self, matched: &[&Region]) -> RoiResult<(Crs, MultiPolygon<f64>)> {
        let Some(first) = matched.first() else {
            return Err(RoiError::Validation("cannot union an empty region set".into()));
        };
        let crs = first.crs;
        let mut area: Option<MultiPolygon<f64>> = None;
        for region in matched {
            let Some(geometry) = region.geometry_in(crs)? else {
                continue;
            };
            area = Some(match area {
                None => geometry,
                Some(acc) => acc.union(&geometry),
            });
        }
        Ok((crs, area.unwrap_or_else(|| MultiPolygon::new(Vec::new()))))
    }

    pub fn contains(&self, area: &MultiPolygon<f64>, point: Point<f64>) -> bool {
        match self.boundary {
            BoundaryPolicy::Exclusive => area.contains(&point),
            BoundaryPolicy::Inclusive => area.intersects(&point),
        }
    }

    /// Buses of `network` inside the union of all regions matching `query`.
    pub fn select<N: NetworkView + ?Sized>(
        &self,
        network: &N,
        regions: &[Region],
        query: impl Into<RegionQuery>,
    ) -> RoiResult<BusSelection> {
        let query = query.into();
        let matched = self.matching(regions, &query)?;
        let with_area: Vec<&Region> = matched.iter().copied().filter(|r| r.has_area()).collect();
        if with_area.is_empty() {
            debug!(
                matched = matched.len(),
                fragments = ?query.fragments(),
                "matched regions carry no area"
            );
            return Ok(BusSelection {
                regions: Vec::new(),
                crs: matched.first().map_or(network.crs(), |r| r.crs),
                area: MultiPolygon::new(Vec::new()),
                buses: BusSet::new(),
            });
        }
        let (crs, area) = self.union(&with_area)?;
        let from = network.crs();

        let mut buses = BusSet::new();
        for bus in network.buses() {
            let (x, y) = match from.transform(crs, bus.x, bus.y) {
                Ok(p) => p,
                Err(err) => {
                    warn!(bus = bus.id.as_str(), %err, "bus not representable in region frame");
                    continue;
                }
            };
            if self.contains(&area, Point::new(x, y)) {
                buses.insert(bus.id.clone());
            }
        }

        debug!(
            regions = with_area.len(),
            buses = buses.len(),
            fragments = ?query.fragments(),
            "resolved region of interest"
        );

        Ok(BusSelection {
            regions: with_area.iter().map(|r| r.name.clone()).collect(),
            crs,
            area,
            buses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use roi_core::Network;

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ]
    }

    fn regions() -> Vec<Region> {
        vec![
            Region::new("Ingolstadt, Stadt", Crs::Wgs84, square(11.0, 48.0, 1.0)),
            Region::new("Kassel", Crs::Wgs84, square(9.0, 51.0, 1.0)),
            Region::without_geometry("Ingolstadt Umland", Crs::Wgs84),
        ]
    }

    fn network() -> Network {
        let mut network = Network::new();
        network.add_bus(Bus::new("in", 11.5, 48.5, "AC")).unwrap();
        network.add_bus(Bus::new("kassel", 9.5, 51.5, "AC")).unwrap();
        network.add_bus(Bus::new("edge", 11.0, 48.5, "AC")).unwrap();
        network.add_bus(Bus::new("out", 20.0, 20.0, "AC")).unwrap();
        network
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let matcher = RegionMatcher::default();
        let regions = regions();
        let matched = matcher.matching(&regions, &"ingol".into()).unwrap();
        let names: Vec<_> = matched.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ingolstadt, Stadt", "Ingolstadt Umland"]);

        let selection = matcher.select(&network(), &regions, "ingol").unwrap();
        // only the region with area contributes
        assert_eq!(selection.regions, vec!["Ingolstadt, Stadt"]);
        assert!(selection.contains("in"));
    }

    #[test]
    fn test_geometry_less_match_selects_nothing() {
        let regions = vec![Region::without_geometry("Ingolstadt", Crs::WebMercator)];
        let selection = RegionMatcher::default()
            .select(&network(), &regions, "ingolstadt")
            .unwrap();
        assert!(selection.is_empty());
        assert!(selection.regions.is_empty());
        assert!(selection.area.0.is_empty());
        assert_eq!(selection.crs, Crs::WebMercator);
    }

    #[test]
    fn test_no_match_reports_fragments() {
        let matcher = RegionMatcher::default();
        let err = matcher.select(&network(), &regions(), "Berlin").unwrap_err();
        match err {
            RoiError::RegionNotFound { fragments } => assert_eq!(fragments, vec!["Berlin"]),
            other => panic!("expected RegionNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_query_rejected() {
        let matcher = RegionMatcher::default();
        let err = matcher.select(&network(), &regions(), ["  ", ""]).unwrap_err();
        assert!(matches!(err, RoiError::Config(_)));
    }

    #[test]
    fn test_fragments_union() {
        let matcher = RegionMatcher::default();
        let selection = matcher
            .select(&network(), &regions(), ["Ingolstadt", "kassel"])
            .unwrap();
        let ids: Vec<_> = selection.buses.iter().map(|b| b.as_str()).collect();
        assert_eq!(ids, vec!["in", "kassel"]);
        assert_eq!(selection.regions.len(), 2);
    }

    #[test]
    fn test_boundary_policy() {
        let regions = regions();
        let exclusive = RegionMatcher::default()
            .select(&network(), &regions, "Ingolstadt")
            .unwrap();
        assert!(!exclusive.contains("edge"));

        let inclusive = RegionMatcher::new(&RegionConfig {
            boundary: BoundaryPolicy::Inclusive,
            ..RegionConfig::default()
        })
        .select(&network(), &regions, "Ingolstadt")
        .unwrap();
        assert!(inclusive.contains("edge"));
        assert!(inclusive.contains("in"));
    }

    #[test]
    fn test_bus_coordinates_converted_to_region_frame() {
        let (x0, y0) = Crs::Wgs84.transform(Crs::WebMercator, 11.0, 48.0).unwrap();
        let (x1, y1) = Crs::Wgs84.transform(Crs::WebMercator, 12.0, 49.0).unwrap();
        let regions = vec![Region::new(
            "Ingolstadt",
            Crs::WebMercator,
            polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)],
        )];

        let selection = RegionMatcher::default()
            .select(&network(), &regions, "Ingolstadt")
            .unwrap();
        assert_eq!(selection.len(), 1);
        assert!(selection.contains("in"));
        assert_eq!(selection.crs, Crs::WebMercator);
    }

    #[test]
    fn test_mixed_frames_union_in_first_frame() {
        let (x0, y0) = Crs::Wgs84.transform(Crs::WebMercator, 9.0, 51.0).unwrap();
        let (x1, y1) = Crs::Wgs84.transform(Crs::WebMercator, 10.0, 52.0).unwrap();
        let regions = vec![
            Region::new("Ingolstadt", Crs::Wgs84, square(11.0, 48.0, 1.0)),
            Region::new(
                "Kassel",
                Crs::WebMercator,
                polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1)],
            ),
        ];
        let selection = RegionMatcher::default()
            .select(&network(), &regions, ["ingolstadt", "kassel"])
            .unwrap();
        assert_eq!(selection.crs, Crs::Wgs84);
        assert!(selection.contains("in"));
        assert!(selection.contains("kassel"));
        assert!(!selection.contains("out"));
    }
}
