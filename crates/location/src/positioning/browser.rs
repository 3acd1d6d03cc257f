//! Adapter for callback-style geolocation APIs
//!
//! The API reports through exactly one of two callbacks. The adapter turns
//! that into a single awaitable result; whichever callback fires first wins
//! and later calls are ignored.

use super::PositioningBackend;
use crate::error::{LocationError, LocationResult};
use async_trait::async_trait;
use myco_core::config::AccuracyHint;
use myco_geo::Coordinate;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// How old a position the browser may hand back from its own cache
pub const BROWSER_MAXIMUM_AGE: Duration = Duration::from_secs(60);

/// Invoked with the position on success
pub type SuccessCallback = Box<dyn FnOnce(Coordinate) + Send>;

/// Invoked with the failure reason
pub type ErrorCallback = Box<dyn FnOnce(PositionError) + Send>;

/// Failure reported to the error callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionError {
    /// 1 = permission denied, 2 = position unavailable, 3 = timeout
    pub code: u16,
    pub message: String,
}

impl PositionError {
    pub const PERMISSION_DENIED: u16 = 1;
    pub const POSITION_UNAVAILABLE: u16 = 2;
    pub const TIMEOUT: u16 = 3;

    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Options passed along with each request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    pub maximum_age: Duration,
}

impl PositionOptions {
    fn new(accuracy: AccuracyHint, timeout: Duration) -> Self {
        Self {
            enable_high_accuracy: accuracy == AccuracyHint::High,
            timeout,
            maximum_age: BROWSER_MAXIMUM_AGE,
        }
    }
}

/// A geolocation object with a success/error callback pair
pub trait GeolocationApi: Send + Sync {
    fn get_current_position(
        &self,
        success: SuccessCallback,
        error: ErrorCallback,
        options: PositionOptions,
    );
}

/// Adapts a [`GeolocationApi`] to [`PositioningBackend`]
#[derive(Clone)]
pub struct BrowserPositioning {
    api: Arc<dyn GeolocationApi>,
}

impl BrowserPositioning {
    pub fn new(api: Arc<dyn GeolocationApi>) -> Self {
        Self { api }
    }
}

type Slot = Arc<Mutex<Option<oneshot::Sender<LocationResult<Coordinate>>>>>;

fn deliver(slot: &Slot, result: LocationResult<Coordinate>) {
    let sender = slot.lock().ok().and_then(|mut guard| guard.take());
    if let Some(sender) = sender {
        // The receiver is gone once the provider has timed out.
        let _ = sender.send(result);
    }
}

impl From<PositionError> for LocationError {
    fn from(err: PositionError) -> Self {
        match err.code {
            PositionError::PERMISSION_DENIED => LocationError::PermissionDenied,
            PositionError::POSITION_UNAVAILABLE => LocationError::Unavailable,
            PositionError::TIMEOUT => LocationError::Timeout {
                after: Duration::ZERO,
            },
            code => LocationError::Unknown(format!("geolocation error {code}: {}", err.message)),
        }
    }
}

#[async_trait]
impl PositioningBackend for BrowserPositioning {
    async fn acquire(&self, accuracy: AccuracyHint, timeout: Duration) -> LocationResult<Coordinate> {
        let (tx, rx) = oneshot::channel();
        let slot: Slot = Arc::new(Mutex::new(Some(tx)));
        let on_error = Arc::clone(&slot);

        self.api.get_current_position(
            Box::new(move |coord| deliver(&slot, Ok(coord))),
            Box::new(move |err| deliver(&on_error, Err(err.into()))),
            PositionOptions::new(accuracy, timeout),
        );

        match rx.await {
            Ok(Err(LocationError::Timeout { .. })) => {
                Err(LocationError::Timeout { after: timeout })
            }
            Ok(result) => result,
            Err(_) => Err(LocationError::unknown(
                "geolocation callbacks dropped without a result",
            )),
        }
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Behavior {
        Succeed(Coordinate),
        Fail(PositionError),
        Ignore,
        BothCallbacks,
    }

    struct FakeGeolocation {
        behavior: Behavior,
        seen: Mutex<Option<PositionOptions>>,
    }

    impl FakeGeolocation {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                seen: Mutex::new(None),
            })
        }
    }

    impl GeolocationApi for FakeGeolocation {
        fn get_current_position(
            &self,
            success: SuccessCallback,
            error: ErrorCallback,
            options: PositionOptions,
        ) {
            *self.seen.lock().unwrap() = Some(options);
            match &self.behavior {
                Behavior::Succeed(coord) => {
                    let coord = *coord;
                    tokio::spawn(async move { success(coord) });
                }
                Behavior::Fail(err) => error(err.clone()),
                Behavior::Ignore => {}
                Behavior::BothCallbacks => {
                    success(Coordinate::new(1.0, 1.0));
                    error(PositionError::new(2, "late"));
                }
            }
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn test_success_callback_resolves() {
        let api = FakeGeolocation::new(Behavior::Succeed(Coordinate::new(48.85, 2.35)));
        let backend = BrowserPositioning::new(api.clone());

        let coord = backend.acquire(AccuracyHint::High, TIMEOUT).await.unwrap();
        assert_eq!(coord, Coordinate::new(48.85, 2.35));

        let options = api.seen.lock().unwrap().unwrap();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.timeout, TIMEOUT);
        assert_eq!(options.maximum_age, BROWSER_MAXIMUM_AGE);
    }

    #[tokio::test]
    async fn test_balanced_disables_high_accuracy() {
        let api = FakeGeolocation::new(Behavior::Succeed(Coordinate::new(0.0, 0.0)));
        let backend = BrowserPositioning::new(api.clone());

        backend.acquire(AccuracyHint::Balanced, TIMEOUT).await.unwrap();
        assert!(!api.seen.lock().unwrap().unwrap().enable_high_accuracy);
    }

    #[tokio::test]
    async fn test_error_codes_map_to_kinds() {
        let cases = [
            (1, LocationError::PermissionDenied),
            (2, LocationError::Unavailable),
            (3, LocationError::Timeout { after: TIMEOUT }),
        ];
        for (code, expected) in cases {
            let api = FakeGeolocation::new(Behavior::Fail(PositionError::new(code, "nope")));
            let result = BrowserPositioning::new(api).acquire(AccuracyHint::High, TIMEOUT).await;
            assert_eq!(result, Err(expected));
        }
    }

    #[tokio::test]
    async fn test_unknown_code_keeps_message() {
        let api = FakeGeolocation::new(Behavior::Fail(PositionError::new(9, "kaput")));
        let err = BrowserPositioning::new(api)
            .acquire(AccuracyHint::High, TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err, LocationError::unknown("geolocation error 9: kaput"));
    }

    #[tokio::test]
    async fn test_dropped_callbacks_are_unknown() {
        let api = FakeGeolocation::new(Behavior::Ignore);
        let err = BrowserPositioning::new(api)
            .acquire(AccuracyHint::High, TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::LocationErrorKind::Unknown);
    }

    #[tokio::test]
    async fn test_first_callback_wins() {
        let api = FakeGeolocation::new(Behavior::BothCallbacks);
        let coord = BrowserPositioning::new(api)
            .acquire(AccuracyHint::High, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(coord, Coordinate::new(1.0, 1.0));
    }
}
