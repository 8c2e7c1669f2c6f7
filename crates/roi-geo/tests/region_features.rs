use geojson::GeoJson;
use roi_core::{Bus, Crs, Network, RoiError};
use roi_geo::{Region, RegionMatcher};

const DISTRICTS: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "gen": "Ingolstadt" },
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[11.3, 48.7], [11.5, 48.7], [11.5, 48.85], [11.3, 48.85], [11.3, 48.7]]]
      }
    },
    {
      "type": "Feature",
      "properties": { "gen": "Kassel" },
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [
          [[[9.35, 51.25], [9.55, 51.25], [9.55, 51.4], [9.35, 51.4], [9.35, 51.25]]],
          [[[9.6, 51.25], [9.7, 51.25], [9.7, 51.3], [9.6, 51.3], [9.6, 51.25]]]
        ]
      }
    },
    {
      "type": "Feature",
      "properties": { "gen": "Landkreis Kassel Mitte" },
      "geometry": null
    },
    {
      "type": "Feature",
      "properties": { "gen": "Kassel Bahnhof" },
      "geometry": { "type": "Point", "coordinates": [9.48, 51.31] }
    }
  ]
}"#;

fn regions() -> Vec<Region> {
    let collection = match DISTRICTS.parse::<GeoJson>().unwrap() {
        GeoJson::FeatureCollection(fc) => fc,
        other => panic!("expected a feature collection, got {other:?}"),
    };
    collection
        .features
        .iter()
        .map(|f| Region::from_feature(f, "gen", Crs::Wgs84).unwrap())
        .collect()
}

fn network() -> Network {
    let mut network = Network::new();
    network.add_bus(Bus::new("ingolstadt", 11.42, 48.76, "AC")).unwrap();
    network.add_bus(Bus::new("kassel_west", 9.48, 51.31, "AC")).unwrap();
    network.add_bus(Bus::new("kassel_east", 9.65, 51.27, "central_heat")).unwrap();
    network.add_bus(Bus::new("munich", 11.58, 48.14, "AC")).unwrap();
    network
}

#[test]
fn features_convert_to_regions() {
    let regions = regions();
    assert_eq!(regions.len(), 4);
    assert!(regions[0].has_area());
    assert_eq!(regions[1].geometry.as_ref().map(|g| g.0.len()), Some(2));
    assert!(regions[2].geometry.is_none());
    // point geometry carries no area
    assert!(regions[3].geometry.is_none());
}

#[test]
fn missing_name_property_is_a_parse_error() {
    let collection = match DISTRICTS.parse::<GeoJson>().unwrap() {
        GeoJson::FeatureCollection(fc) => fc,
        _ => unreachable!(),
    };
    let err = Region::from_feature(&collection.features[0], "name", Crs::Wgs84).unwrap_err();
    assert!(matches!(err, RoiError::Parse(_)));
}

#[test]
fn multipolygon_region_selects_every_part() {
    let selection = RegionMatcher::default()
        .select(&network(), &regions(), "kassel")
        .unwrap();
    assert_eq!(selection.regions, vec!["Kassel".to_string()]);
    let ids: Vec<_> = selection.buses.iter().map(|b| b.as_str()).collect();
    assert_eq!(ids, vec!["kassel_west", "kassel_east"]);
}

#[test]
fn selection_is_subset_of_network_and_keeps_attributes() {
    let network = network();
    let selection = RegionMatcher::default()
        .select(&network, &regions(), ["Ingolstadt", "KASSEL"])
        .unwrap();
    let resolved = selection.resolve(&network);
    assert_eq!(resolved.len(), 3);
    assert!(resolved.iter().all(|b| b.id.as_str() != "munich"));
    let east = resolved.iter().find(|b| b.id.as_str() == "kassel_east").unwrap();
    assert_eq!(east.carrier.as_str(), "central_heat");
    assert_eq!(east.x, 9.65);
}

#[test]
fn fragment_matching_only_arealess_features_selects_nothing() {
    // "Bahnhof" names only the point feature
    let selection = RegionMatcher::default()
        .select(&network(), &regions(), "bahnhof")
        .unwrap();
    assert!(selection.is_empty());
    assert!(selection.regions.is_empty());

    let err = RegionMatcher::default()
        .select(&network(), &regions(), "berlin")
        .unwrap_err();
    assert!(matches!(err, RoiError::RegionNotFound { .. }));
}
