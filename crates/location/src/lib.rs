//! Location acquisition for Myco
//!
//! This crate provides:
//! - [`LocationProvider`]: current coordinate, served from a fresh cached fix
//!   or a timeout-bounded platform request
//! - [`LocationCache`]: single-slot persistence of the last fix and the car position
//! - [`positioning`]: adapters for native, browser-style and fixed positioning
//! - [`CarNavigation`]: distance and map link back to the saved car
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use myco_core::store::MemoryStore;
//! use myco_geo::Coordinate;
//! use myco_location::positioning::FixedPositioning;
//! use myco_location::{AcquireOptions, LocationCache, LocationProvider};
//!
//! # tokio_test();
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn tokio_test() {
//! let cache = LocationCache::new(Arc::new(MemoryStore::new()));
//! let backend = Arc::new(FixedPositioning::new(Coordinate::new(45.83, 6.86)));
//! let provider = LocationProvider::new(backend, cache);
//!
//! let here = provider.get_current_location(AcquireOptions::default()).await.unwrap();
//! assert_eq!(here, Coordinate::new(45.83, 6.86));
//! # }
//! ```

pub mod cache;
pub mod car;
pub mod clock;
mod error;
pub mod positioning;
pub mod provider;

pub use cache::{is_fresh, CarLocation, LocationCache, TimestampedLocation, DEFAULT_MAX_AGE};
pub use car::CarNavigation;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{LocationError, LocationErrorKind, LocationResult};
pub use myco_core::config::AccuracyHint;
pub use provider::{
    AcquireOptions, AcquisitionState, Fix, FixSource, LocationProvider, LocationSettings,
    StateObserver, DEFAULT_ACQUISITION_TIMEOUT,
};
