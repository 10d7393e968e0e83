//! Great-circle distance helpers

use crate::models::GeoPoint;
use haversine::{Location as HaversineLocation, Units, distance};

/// Great-circle distance between two points in kilometers
#[must_use]
pub fn distance_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let from_haversine = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to_haversine = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from_haversine, to_haversine, Units::Kilometers)
}

/// Whether `candidate` lies within `radius_km` of `center`.
///
/// The boundary is inclusive: a candidate at exactly `radius_km` passes.
#[must_use]
pub fn within_radius(center: &GeoPoint, candidate: &GeoPoint, radius_km: f64) -> bool {
    distance_km(center, candidate) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_distance_along_meridian() {
        // 0.05 degrees of latitude is roughly 5.56 km
        let origin = GeoPoint::new(0.0, 0.0);
        let near = GeoPoint::new(0.05, 0.0);
        let d = distance_km(&origin, &near);
        assert!((d - 5.56).abs() < 0.05, "got {d}");

        // One full degree is roughly 111 km
        let far = GeoPoint::new(1.0, 0.0);
        let d = distance_km(&origin, &far);
        assert!((d - 111.2).abs() < 0.5, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(46.8182, 8.2275);
        let b = GeoPoint::new(47.3769, 8.5417);
        assert!((distance_km(&a, &b) - distance_km(&b, &a)).abs() < 1e-9);
    }

    #[rstest]
    #[case(0.05, 15.0, true)] // ~5.56 km, well inside
    #[case(1.0, 15.0, false)] // ~111 km, well outside
    #[case(0.05, 5.0, false)] // inside 15 but outside a tighter radius
    fn test_within_radius(#[case] lat: f64, #[case] radius_km: f64, #[case] expected: bool) {
        let center = GeoPoint::new(0.0, 0.0);
        let candidate = GeoPoint::new(lat, 0.0);
        assert_eq!(within_radius(&center, &candidate, radius_km), expected);
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let center = GeoPoint::new(0.0, 0.0);
        let candidate = GeoPoint::new(0.1, 0.0);
        let exact = distance_km(&center, &candidate);
        assert!(within_radius(&center, &candidate, exact));
        assert!(!within_radius(&center, &candidate, exact - 0.0001));
    }
}
