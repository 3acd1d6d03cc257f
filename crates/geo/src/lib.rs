//! Geospatial primitives for Myco.
//!
//! This crate provides:
//! - The [`Coordinate`] record shared by every location component
//! - Haversine great-circle distance (meters and kilometers)
//! - Map and share links for a coordinate
//!
//! # Example
//!
//! ```
//! use myco_geo::{distance_meters, Coordinate};
//!
//! let paris = Coordinate::new(48.8566, 2.3522);
//! let lyon = Coordinate::new(45.7640, 4.8357);
//!
//! let meters = distance_meters(&paris, &lyon);
//! assert!((meters - 392_000.0).abs() < 8_000.0);
//! ```

mod error;
mod haversine;
pub mod maps;

pub use error::{GeoError, GeoErrorCode, Result};
pub use haversine::{distance_meters, haversine_distance, EARTH_RADIUS_KM, EARTH_RADIUS_M};
pub use maps::{maps_url, share_message, share_url};

use serde::{Deserialize, Serialize};

/// A geographic coordinate as reported by a positioning backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180)
    pub longitude: f64,
    /// Radius of uncertainty in meters, when the backend reports one
    #[serde(rename = "accuracy", default, skip_serializing_if = "Option::is_none")]
    pub accuracy_meters: Option<f64>,
}

impl Coordinate {
    /// Creates a new coordinate without an accuracy radius.
    ///
    /// No range checking is done; use [`Coordinate::try_new`] for untrusted input.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: None,
        }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(GeoError::InvalidCoordinate(format!(
                "latitude {latitude}, longitude {longitude} out of range"
            )))
        }
    }

    /// Attaches an accuracy radius in meters.
    #[must_use]
    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy_meters = Some(meters);
        self
    }

    /// Returns true if both components are finite and within their valid ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Formats as `"lat, lon"` with the given number of decimals.
    pub fn display(&self, precision: usize) -> String {
        format!(
            "{:.prec$}, {:.prec$}",
            self.latitude,
            self.longitude,
            prec = precision
        )
    }

    /// Formats the accuracy radius as whole meters, e.g. `"12m"`.
    pub fn accuracy_display(&self) -> Option<String> {
        self.accuracy_meters.map(|m| format!("{m:.0}m"))
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}
