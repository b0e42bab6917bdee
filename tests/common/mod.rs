#![allow(dead_code)]

use approx::assert_relative_eq;
use qibla::engine::{QiblaReport, SolarReport};
use qibla::geo_point::GeoPoint;
use rand::rngs::StdRng;
use rand::Rng;

pub const JAKARTA_LAT: &str = "6° 10’ 0.0” S";
pub const JAKARTA_LON: &str = "106° 49’ 0.0” E";

/// Uniform random point, latitudes kept away from the poles.
pub fn random_point(rng: &mut StdRng, max_latitude: f64) -> GeoPoint {
    let lat = rng.random_range(-max_latitude..=max_latitude);
    let lon = rng.random_range(-180.0..180.0);
    GeoPoint::from_decimal(lat, lon).unwrap()
}

pub fn assert_solar_close(actual: &SolarReport, expected: &SolarReport, epsilon: f64) {
    assert_eq!(actual.utc_time, expected.utc_time);
    assert_relative_eq!(actual.azimuth_deg, expected.azimuth_deg, epsilon = epsilon);
    assert_relative_eq!(
        actual.elevation_deg,
        expected.elevation_deg,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.shadow_bearing_deg,
        expected.shadow_bearing_deg,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.sun_qibla_diff_deg,
        expected.sun_qibla_diff_deg,
        epsilon = epsilon
    );
    assert_relative_eq!(
        actual.shadow_qibla_diff_deg,
        expected.shadow_qibla_diff_deg,
        epsilon = epsilon
    );
}

pub fn assert_report_close(actual: &QiblaReport, expected: &QiblaReport, epsilon: f64) {
    assert_eq!(actual.observer, expected.observer);
    assert_relative_eq!(
        actual.qibla_bearing_deg,
        expected.qibla_bearing_deg,
        epsilon = epsilon
    );
    assert_relative_eq!(actual.distance_km, expected.distance_km, epsilon = epsilon);
    match (&actual.solar, &expected.solar) {
        (Some(a), Some(e)) => assert_solar_close(a, e, epsilon),
        (None, None) => {}
        _ => panic!("solar section present in only one report"),
    }
}
