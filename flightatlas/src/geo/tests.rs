use super::*;

#[test]
fn valid_point_round_trips() {
    let p = GeoPoint::new(33.9425, -118.408).unwrap();
    assert!((p.lat - 33.9425).abs() < 1e-9);
    assert!((p.lon - (-118.408)).abs() < 1e-9);
}

#[test]
fn poles_and_antimeridian_edges_are_valid() {
    assert!(GeoPoint::new(90.0, 0.0).is_ok());
    assert!(GeoPoint::new(-90.0, 0.0).is_ok());
    assert!(GeoPoint::new(0.0, 180.0).is_ok());
    assert!(GeoPoint::new(0.0, -180.0).is_ok());
}

#[test]
fn out_of_range_latitude_rejected() {
    assert_eq!(
        GeoPoint::new(90.1, 0.0),
        Err(GeoError::InvalidLatitude(90.1))
    );
    assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
}

#[test]
fn out_of_range_longitude_rejected() {
    assert_eq!(
        GeoPoint::new(0.0, -180.5),
        Err(GeoError::InvalidLongitude(-180.5))
    );
    assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
}

#[test]
fn lon_offset_is_unvalidated() {
    let p = GeoPoint::new(10.0, 170.0).unwrap();
    let shifted = p.with_lon_offset(360.0);
    assert!((shifted.lon - 530.0).abs() < 1e-9);
    assert!((shifted.lat - 10.0).abs() < 1e-9);
}

#[test]
fn lon_delta_is_raw_difference() {
    let a = GeoPoint::new(0.0, -170.0).unwrap();
    let b = GeoPoint::new(0.0, 170.0).unwrap();
    assert!((lon_delta(&a, &b) - 340.0).abs() < 1e-9);
    assert!((lon_delta(&b, &a) + 340.0).abs() < 1e-9);
}
