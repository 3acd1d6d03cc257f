//! Error types for location acquisition

use myco_core::{Error, ErrorCode};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for location operations
pub type LocationResult<T> = Result<T, LocationError>;

/// Why no coordinate could be produced
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    /// The platform did not deliver a fix in time
    #[error("Location acquisition timed out after {after:?}")]
    Timeout {
        /// The timeout that elapsed
        after: Duration,
    },

    /// The caller may not read the device position
    #[error("Permission to read the device position was denied")]
    PermissionDenied,

    /// No positioning capability exists on this platform or runtime
    #[error("Positioning is not available on this platform")]
    Unavailable,

    /// Any other backend failure, with the backend's message
    #[error("Positioning backend failed: {0}")]
    Unknown(String),
}

/// Fieldless discriminant of [`LocationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationErrorKind {
    Timeout,
    PermissionDenied,
    Unavailable,
    Unknown,
}

impl LocationErrorKind {
    /// Stable snake_case name, used in metric names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::PermissionDenied => "permission_denied",
            Self::Unavailable => "unavailable",
            Self::Unknown => "unknown",
        }
    }
}

impl LocationError {
    /// Create an unknown-backend error
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown(message.into())
    }

    /// Discriminant without payload
    #[must_use]
    pub fn kind(&self) -> LocationErrorKind {
        match self {
            Self::Timeout { .. } => LocationErrorKind::Timeout,
            Self::PermissionDenied => LocationErrorKind::PermissionDenied,
            Self::Unavailable => LocationErrorKind::Unavailable,
            Self::Unknown(_) => LocationErrorKind::Unknown,
        }
    }

    /// Whether asking again may succeed without user action
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether the app should carry on without location rather than block
    #[must_use]
    pub fn allows_degraded_mode(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::Unavailable)
    }
}

impl From<LocationError> for Error {
    fn from(err: LocationError) -> Self {
        let (code, suggestion) = match &err {
            LocationError::Timeout { .. } => (
                ErrorCode::LocationTimeout,
                Some("Move to an open area and try again"),
            ),
            LocationError::PermissionDenied => (
                ErrorCode::LocationPermissionDenied,
                Some("Allow location access for Myco in the system settings"),
            ),
            LocationError::Unavailable => (ErrorCode::LocationUnavailable, None),
            LocationError::Unknown(_) => (ErrorCode::LocationError, None),
        };

        let converted = Error::new(code, err.to_string());
        match suggestion {
            Some(s) => converted.with_suggestion(s),
            None => converted,
        }
    }
}
