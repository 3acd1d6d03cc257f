//! Adapter for OS location services

use super::PositioningBackend;
use crate::error::{LocationError, LocationResult};
use async_trait::async_trait;
use myco_core::config::AccuracyHint;
use myco_geo::Coordinate;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Outcome of a foreground permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// The OS location service as seen from Rust
#[async_trait]
pub trait NativeLocationService: Send + Sync {
    /// Ask for foreground location permission; may prompt the user
    async fn request_permission(&self) -> PermissionStatus;

    /// Read the current position
    async fn current_position(
        &self,
        accuracy: AccuracyHint,
        timeout: Duration,
    ) -> LocationResult<Coordinate>;
}

/// Requests permission, then a fix, from a [`NativeLocationService`]
#[derive(Clone)]
pub struct NativePositioning {
    service: Arc<dyn NativeLocationService>,
}

impl NativePositioning {
    pub fn new(service: Arc<dyn NativeLocationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PositioningBackend for NativePositioning {
    async fn acquire(&self, accuracy: AccuracyHint, timeout: Duration) -> LocationResult<Coordinate> {
        if self.service.request_permission().await == PermissionStatus::Denied {
            debug!("Foreground location permission denied");
            return Err(LocationError::PermissionDenied);
        }
        self.service.current_position(accuracy, timeout).await
    }

    fn name(&self) -> &'static str {
        "native"
    }
}
