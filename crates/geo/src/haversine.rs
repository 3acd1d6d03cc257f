//! Haversine distance calculation.
//!
//! The Haversine formula calculates the great-circle distance between two points
//! on a sphere given their longitudes and latitudes. Accuracy radii are ignored.

use crate::Coordinate;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth's mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculates the great-circle distance between two coordinates in meters.
///
/// Symmetric in its arguments and zero for identical points. Any finite
/// latitude/longitude pair is accepted.
///
/// # Example
/// ```
/// use myco_geo::{distance_meters, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(0.0, 1.0);
///
/// let meters = distance_meters(&a, &b);
/// assert!((meters - 111_195.0).abs() < 1_112.0);
/// ```
#[inline]
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    haversine_distance_with_radius(a, b, EARTH_RADIUS_M)
}

/// Calculates the great-circle distance between two coordinates in kilometers.
#[inline]
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    haversine_distance_with_radius(from, to, EARTH_RADIUS_KM)
}

#[inline]
fn haversine_distance_with_radius(from: &Coordinate, to: &Coordinate, radius: f64) -> f64 {
    let (lat1, lon1) = from.to_radians();
    let (lat2, lon2) = to.to_radians();

    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `a` just past 1.0 near antipodes.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PARIS: Coordinate = Coordinate::new(48.8566, 2.3522);
    const LYON: Coordinate = Coordinate::new(45.7640, 4.8357);
    const NULL_ISLAND: Coordinate = Coordinate::new(0.0, 0.0);

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let distance = distance_meters(&NULL_ISLAND, &Coordinate::new(0.0, 1.0));
        // Expected: ~111,195 m
        assert!((distance - 111_195.0).abs() < 111_195.0 * 0.01, "1 deg: {}", distance);
    }

    #[test]
    fn test_paris_to_lyon() {
        let distance = distance_meters(&PARIS, &LYON);
        // Expected: ~392 km
        assert!((distance - 392_000.0).abs() < 392_000.0 * 0.02, "Paris-Lyon: {}", distance);
    }

    #[test]
    fn test_same_point_zero_distance() {
        assert_eq!(distance_meters(&PARIS, &PARIS), 0.0);
    }

    #[test]
    fn test_accuracy_is_ignored() {
        let fuzzy = PARIS.with_accuracy(500.0);
        assert_eq!(distance_meters(&PARIS, &fuzzy), 0.0);
    }

    #[test]
    fn test_antipodal_points() {
        let distance = distance_meters(&NULL_ISLAND, &Coordinate::new(0.0, 180.0));
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_M;
        assert!((distance - half_circumference).abs() < 1.0);
    }

    #[test]
    fn test_km_matches_meters() {
        let km = haversine_distance(&PARIS, &LYON);
        let meters = distance_meters(&PARIS, &LYON);
        assert!((meters - km * 1000.0).abs() < 1.0);
    }

    proptest! {
        #[test]
        fn prop_symmetric(
            lat1 in -90.0f64..=90.0, lon1 in -180.0f64..=180.0,
            lat2 in -90.0f64..=90.0, lon2 in -180.0f64..=180.0,
        ) {
            let a = Coordinate::new(lat1, lon1);
            let b = Coordinate::new(lat2, lon2);
            prop_assert!((distance_meters(&a, &b) - distance_meters(&b, &a)).abs() < 1e-6);
        }

        #[test]
        fn prop_zero_for_same_point(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let a = Coordinate::new(lat, lon);
            prop_assert_eq!(distance_meters(&a, &a), 0.0);
        }

        #[test]
        fn prop_bounded_by_half_circumference(
            lat1 in -90.0f64..=90.0, lon1 in -180.0f64..=180.0,
            lat2 in -90.0f64..=90.0, lon2 in -180.0f64..=180.0,
        ) {
            let d = distance_meters(&Coordinate::new(lat1, lon1), &Coordinate::new(lat2, lon2));
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_M + 1e-6);
        }
    }
}
