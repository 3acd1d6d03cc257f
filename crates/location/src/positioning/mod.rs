//! Platform positioning adapters
//!
//! [`PositioningBackend`] is the single capability the provider depends on.
//! The host picks one implementation at startup:
//!
//! - [`NativePositioning`] - an OS location service with a permission prompt
//! - [`BrowserPositioning`] - a callback-style geolocation API
//! - [`FixedPositioning`] - a known coordinate (manual entry, demos, tests)
//! - [`UnsupportedPositioning`] - the runtime has no positioning at all

mod browser;
mod fixed;
mod native;

pub use browser::{
    BrowserPositioning, ErrorCallback, GeolocationApi, PositionError, PositionOptions,
    SuccessCallback, BROWSER_MAXIMUM_AGE,
};
pub use fixed::FixedPositioning;
pub use native::{NativeLocationService, NativePositioning, PermissionStatus};

use crate::error::LocationResult;
use crate::LocationError;
use async_trait::async_trait;
use myco_core::config::AccuracyHint;
use myco_geo::Coordinate;
use std::time::Duration;

/// Acquires the device's current coordinate
#[async_trait]
pub trait PositioningBackend: Send + Sync {
    /// Request one fix.
    ///
    /// `timeout` is forwarded so backends with their own timer can use it;
    /// the provider enforces it regardless.
    async fn acquire(&self, accuracy: AccuracyHint, timeout: Duration) -> LocationResult<Coordinate>;

    /// Adapter name (for logging)
    fn name(&self) -> &'static str;
}

/// Backend for runtimes without any positioning capability
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPositioning;

#[async_trait]
impl PositioningBackend for UnsupportedPositioning {
    async fn acquire(&self, _accuracy: AccuracyHint, _timeout: Duration) -> LocationResult<Coordinate> {
        Err(LocationError::Unavailable)
    }

    fn name(&self) -> &'static str {
        "unsupported"
    }
}
