//! Distance and directions back to the saved car

use crate::cache::CarLocation;
use myco_geo::{distance_meters, maps_url, Coordinate};
use serde::Serialize;

/// What the user sees when asking for the way back to the car
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarNavigation {
    pub car: CarLocation,
    pub distance_meters: f64,
    pub maps_url: String,
}

impl CarNavigation {
    pub fn new(current: &Coordinate, car: CarLocation) -> Self {
        Self {
            distance_meters: distance_meters(current, &car.coordinate),
            maps_url: maps_url(&car.coordinate),
            car,
        }
    }

    /// Distance rounded to whole meters, e.g. `"842m"`
    pub fn distance_display(&self) -> String {
        format!("{:.0}m", self.distance_meters)
    }

    /// Distance followed by the car's coordinates
    pub fn summary(&self) -> String {
        format!(
            "Distance: {}\n\nCoordinates: {}",
            self.distance_display(),
            self.car.coordinate.display(6)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_navigation_to_car() {
        let car = CarLocation::new(Coordinate::new(0.0, 0.01), Utc::now());
        let nav = CarNavigation::new(&Coordinate::new(0.0, 0.0), car);

        // 0.01 degrees of longitude at the equator
        assert!((nav.distance_meters - 1_111.95).abs() < 1.0);
        assert_eq!(nav.distance_display(), "1112m");
        assert_eq!(nav.maps_url, "https://maps.google.com/?q=0,0.01");
        assert!(nav.summary().ends_with("Coordinates: 0.000000, 0.010000"));
    }

    #[test]
    fn test_standing_at_car() {
        let spot = Coordinate::new(45.1, 4.2);
        let nav = CarNavigation::new(&spot, CarLocation::new(spot, Utc::now()));
        assert_eq!(nav.distance_display(), "0m");
    }
}
