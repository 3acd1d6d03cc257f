//! Backend that always reports the same coordinate

use super::PositioningBackend;
use crate::error::LocationResult;
use async_trait::async_trait;
use myco_core::config::AccuracyHint;
use myco_geo::Coordinate;
use std::time::Duration;

/// Reports a known coordinate, optionally after a delay
#[derive(Debug, Clone, Copy)]
pub struct FixedPositioning {
    coordinate: Coordinate,
    delay: Duration,
}

impl FixedPositioning {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            delay: Duration::ZERO,
        }
    }

    /// Simulate a slow fix
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl PositioningBackend for FixedPositioning {
    async fn acquire(&self, _accuracy: AccuracyHint, _timeout: Duration) -> LocationResult<Coordinate> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.coordinate)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LocationCache;
    use crate::error::LocationError;
    use crate::provider::{AcquireOptions, LocationProvider, LocationSettings};
    use myco_core::store::MemoryStore;
    use std::sync::Arc;

    const CAR_PARK: Coordinate = Coordinate::new(46.2044, 6.1432);

    #[tokio::test]
    async fn test_reports_coordinate() {
        let backend = FixedPositioning::new(CAR_PARK);
        assert_eq!(
            backend.acquire(AccuracyHint::High, Duration::from_secs(1)).await,
            Ok(CAR_PARK)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fix_hits_provider_timeout() {
        let backend = Arc::new(FixedPositioning::new(CAR_PARK).with_delay(Duration::from_secs(30)));
        let provider = LocationProvider::new(backend, LocationCache::new(Arc::new(MemoryStore::new())))
            .with_settings(LocationSettings {
                timeout: Duration::from_secs(2),
                ..LocationSettings::default()
            });

        let result = provider.get_current_location(AcquireOptions::default()).await;
        assert_eq!(
            result,
            Err(LocationError::Timeout {
                after: Duration::from_secs(2)
            })
        );
    }
}
