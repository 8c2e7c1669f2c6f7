use roi_core::{Bus, Crs};
use roi_geo::{DuplicateCoordinateResolver, JitterConfig};

fn resolver(radius: f64) -> DuplicateCoordinateResolver {
    DuplicateCoordinateResolver::new(&JitterConfig {
        radius,
        ..JitterConfig::default()
    })
    .unwrap()
}

fn site_buses() -> Vec<Bus> {
    vec![
        Bus::new("ac", 11.4258, 48.7665, "AC"),
        Bus::new("heat", 11.4258, 48.7665, "central_heat"),
        Bus::new("gas", 11.4258, 48.7665, "CH4"),
        Bus::new("alone", 11.50, 48.70, "AC"),
        Bus::new("pair_a", 9.4797, 51.3127, "AC"),
        Bus::new("pair_b", 9.4797, 51.3127, "rural_heat"),
    ]
}

#[test]
fn output_preserves_count_order_and_attributes() {
    let buses = site_buses();
    let out = resolver(25.0).resolve(&buses, Crs::Wgs84).unwrap();
    assert_eq!(out.len(), buses.len());
    for (before, after) in buses.iter().zip(&out) {
        assert_eq!(before.id, after.id);
        assert_eq!(before.carrier, after.carrier);
    }
}

#[test]
fn non_duplicated_buses_are_bit_identical() {
    let buses = site_buses();
    let out = resolver(25.0).resolve(&buses, Crs::Wgs84).unwrap();
    assert_eq!(out[3].x.to_bits(), buses[3].x.to_bits());
    assert_eq!(out[3].y.to_bits(), buses[3].y.to_bits());
}

#[test]
fn groups_land_on_the_jitter_circle() {
    let radius = 25.0;
    let resolver = resolver(radius);
    let buses = site_buses();
    let out = resolver.resolve(&buses, Crs::Wgs84).unwrap();

    for group in [&[0usize, 1, 2][..], &[4, 5][..]] {
        let first = &buses[group[0]];
        let center = Crs::Wgs84.transform(Crs::WebMercator, first.x, first.y).unwrap();
        let metric: Vec<(f64, f64)> = group
            .iter()
            .map(|&i| Crs::Wgs84.transform(Crs::WebMercator, out[i].x, out[i].y).unwrap())
            .collect();

        for &(x, y) in &metric {
            let distance = ((x - center.0).powi(2) + (y - center.1).powi(2)).sqrt();
            assert!((distance - radius).abs() < 1e-6, "distance {distance}");
        }
        for (i, a) in metric.iter().enumerate() {
            for b in &metric[i + 1..] {
                let gap = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
                assert!(gap > 1.0, "coincident output points");
            }
        }
    }
}

#[test]
fn rounding_groups_nearly_identical_points() {
    // 1 cm apart in metric space: same bucket at one decimal
    let (x, y) = Crs::Wgs84.transform(Crs::WebMercator, 11.0, 48.0).unwrap();
    let buses = vec![
        Bus::new("a", x, y, "AC"),
        Bus::new("b", x + 0.01, y, "AC"),
    ];
    let out = resolver(5.0).resolve(&buses, Crs::WebMercator).unwrap();
    assert_ne!(out[0].x.to_bits(), buses[0].x.to_bits());
    assert_ne!(out[1].x.to_bits(), buses[1].x.to_bits());
}
