//! Current-location acquisition
//!
//! Each call walks `Idle -> CheckingCache -> (Resolved | Acquiring)` and an
//! acquisition ends in `Resolved` or `Failed`. A fresh cached fix
//! short-circuits the platform; otherwise one bounded request is made and,
//! on success, replaces the cached fix. Nothing is retried here.
//!
//! Concurrent calls are not coalesced: each one that misses the cache issues
//! its own platform request.

use crate::cache::{LocationCache, TimestampedLocation, DEFAULT_MAX_AGE};
use crate::clock::{Clock, SystemClock};
use crate::error::{LocationError, LocationErrorKind, LocationResult};
use crate::positioning::PositioningBackend;
use myco_core::config::{AccuracyHint, LocationConfig};
use myco_geo::Coordinate;
use myco_telemetry::{metrics, Timer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Time allowed for one platform acquisition
pub const DEFAULT_ACQUISITION_TIMEOUT: Duration = Duration::from_secs(10);

/// Thresholds fixed for the lifetime of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationSettings {
    /// Oldest cached fix that is still returned
    pub max_age: Duration,
    /// Upper bound on a platform acquisition
    pub timeout: Duration,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            max_age: DEFAULT_MAX_AGE,
            timeout: DEFAULT_ACQUISITION_TIMEOUT,
        }
    }
}

impl From<&LocationConfig> for LocationSettings {
    fn from(config: &LocationConfig) -> Self {
        Self {
            max_age: config.max_age(),
            timeout: config.acquisition_timeout(),
        }
    }
}

/// Per-call options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AcquireOptions {
    /// Forwarded to the backend as a hint
    pub accuracy: AccuracyHint,
    /// Skip the cache and always ask the platform
    pub force_refresh: bool,
}

impl AcquireOptions {
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: AccuracyHint) -> Self {
        self.accuracy = accuracy;
        self
    }

    #[must_use]
    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

/// Where a resolved coordinate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixSource {
    Cache,
    Platform,
}

/// A resolved coordinate with its capture time and origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub location: TimestampedLocation,
    pub source: FixSource,
}

impl Fix {
    pub fn coordinate(&self) -> Coordinate {
        self.location.coordinate
    }
}

/// Progress of a single acquisition call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    Idle,
    CheckingCache,
    Acquiring,
    Resolved(FixSource),
    Failed(LocationErrorKind),
}

/// Receives every state a call passes through
pub type StateObserver = Arc<dyn Fn(AcquisitionState) + Send + Sync>;

/// Produces the current coordinate from cache or platform
#[derive(Clone)]
pub struct LocationProvider {
    backend: Arc<dyn PositioningBackend>,
    cache: LocationCache,
    clock: Arc<dyn Clock>,
    settings: LocationSettings,
    observer: Option<StateObserver>,
}

impl LocationProvider {
    /// Create a provider with the system clock and default thresholds
    pub fn new(backend: Arc<dyn PositioningBackend>, cache: LocationCache) -> Self {
        Self {
            backend,
            cache,
            clock: Arc::new(SystemClock),
            settings: LocationSettings::default(),
            observer: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: LocationSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The cache this provider reads and refreshes
    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }

    pub fn settings(&self) -> LocationSettings {
        self.settings
    }

    /// Current coordinate, preferring a fresh cached fix
    pub async fn get_current_location(&self, options: AcquireOptions) -> LocationResult<Coordinate> {
        self.acquire(options).await.map(|fix| fix.coordinate())
    }

    /// Like [`LocationProvider::get_current_location`], also reporting where the fix came from
    pub async fn acquire(&self, options: AcquireOptions) -> LocationResult<Fix> {
        self.transition(AcquisitionState::Idle);

        if !options.force_refresh {
            self.transition(AcquisitionState::CheckingCache);
            let now = self.clock.now_millis();
            if let Some(location) = self.cache.fresh_location(now, self.settings.max_age) {
                metrics().increment("location.cache_hit");
                debug!(age_ms = location.age_millis(now), "Using cached fix");
                self.transition(AcquisitionState::Resolved(FixSource::Cache));
                return Ok(Fix {
                    location,
                    source: FixSource::Cache,
                });
            }
            metrics().increment("location.cache_miss");
        }

        self.transition(AcquisitionState::Acquiring);
        match self.acquire_from_platform(options.accuracy).await {
            Ok(coordinate) => {
                let location = TimestampedLocation::new(coordinate, self.clock.now_millis());
                self.cache.store_location(&location);
                metrics().increment("location.acquired");
                info!(
                    backend = self.backend.name(),
                    accuracy_m = ?coordinate.accuracy_meters,
                    "Location acquired"
                );
                self.transition(AcquisitionState::Resolved(FixSource::Platform));
                Ok(Fix {
                    location,
                    source: FixSource::Platform,
                })
            }
            Err(e) => {
                metrics().increment(&format!("location.failed.{}", e.kind().as_str()));
                warn!(backend = self.backend.name(), error = %e, "Location acquisition failed");
                self.transition(AcquisitionState::Failed(e.kind()));
                Err(e)
            }
        }
    }

    async fn acquire_from_platform(&self, accuracy: AccuracyHint) -> LocationResult<Coordinate> {
        let timeout = self.settings.timeout;
        let timer = Timer::start("location.acquire_ms");
        // Dropping the request on timeout discards any late result.
        let outcome = tokio::time::timeout(timeout, self.backend.acquire(accuracy, timeout)).await;
        timer.stop();

        match outcome {
            Ok(Ok(coordinate)) if coordinate.is_valid() => Ok(coordinate),
            Ok(Ok(coordinate)) => Err(LocationError::unknown(format!(
                "backend returned out-of-range coordinate ({}, {})",
                coordinate.latitude, coordinate.longitude
            ))),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(LocationError::Timeout { after: timeout }),
        }
    }

    fn transition(&self, state: AcquisitionState) {
        debug!(?state, "Location acquisition state");
        if let Some(observer) = &self.observer {
            observer(state);
        }
    }
}
