//! Error type shared by every Myco crate
//!
//! An [`Error`] carries a numeric [`ErrorCode`] whose thousands digit names
//! the failing area, plus optional context and a suggestion for the user.
//! The command line renders it directly or as an [`ErrorReport`] in JSON mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes, grouped by area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invariant broken inside Myco itself
    Internal = 1001,

    /// Filesystem failure without a more specific code
    IoError = 2000,
    /// A file that had to exist is missing
    FileNotFound = 2001,
    /// The OS refused access to a file
    PermissionDenied = 2002,

    /// Configuration could not be read
    ConfigError = 3000,
    /// An explicitly named configuration file does not exist
    ConfigNotFound = 3001,
    /// Configuration is not valid TOML for the schema
    ConfigParseError = 3002,
    /// Configuration parsed but holds unusable values
    ConfigValidationError = 3003,

    /// The key-value store cannot be written
    StorageUnavailable = 4001,
    /// The key-value store file is not a JSON object
    StorageCorrupt = 4002,

    /// Positioning failed for an unclassified reason
    LocationError = 5000,
    /// No fix arrived in time
    LocationTimeout = 5001,
    /// The user refused location access
    LocationPermissionDenied = 5002,
    /// The device cannot produce a position
    LocationUnavailable = 5003,

    /// Input rejected before any work was done
    ValidationError = 6000,
}

impl ErrorCode {
    /// Numeric value, e.g. `5001`
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Area the code belongs to
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Storage",
            5 => "Location",
            6 => "Validation",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Coded error with optional context and recovery suggestion
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// What was being done when it failed
    pub context: Option<String>,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Underlying error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {ctx}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create an error with no context or suggestion
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Attach context
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attach a recovery suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach the underlying error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Serializable form for `--json` output
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            code_str: self.code.to_string(),
            category: self.code.category().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
            suggestion: self.suggestion.clone(),
            source: self.source.as_ref().map(|e| e.to_string()),
        }
    }

    /// Configuration file could not be read
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Explicitly requested configuration file is missing
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .myco.toml file or use --config to specify a path")
    }

    /// Configuration holds an unusable value
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigValidationError, message)
    }

    /// Store file or directory cannot be written
    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageUnavailable, message)
            .with_suggestion("Check that the data directory exists and is writable")
    }

    /// Rejected user input
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }
}

/// JSON shape of an [`Error`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Symbolic code, e.g. `LOCATION_TIMEOUT`
    pub code: ErrorCode,
    /// Display code, e.g. `E5001`
    pub code_str: String,
    /// Area of the code
    pub category: String,
    /// Human-readable message
    pub message: String,
    /// Context, when attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Suggestion, when attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Underlying error message, when attached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Result alias over [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes of the `myco` binary
pub mod exit_codes {
    /// Any failure without a dedicated code
    pub const FAILURE: i32 = 1;
    /// Bad arguments or missing saved data
    pub const VALIDATION_ERROR: i32 = 2;
    /// Configuration missing or invalid
    pub const CONFIG_ERROR: i32 = 3;
    /// No position could be produced
    pub const NO_LOCATION: i32 = 4;
    /// Acquisition timed out
    pub const TIMEOUT: i32 = 124;
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::StorageCorrupt, format!("JSON error: {err}")).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}"))
            .with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::LocationTimeout.to_string(), "E5001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::StorageCorrupt.category(), "Storage");
        assert_eq!(ErrorCode::LocationUnavailable.category(), "Location");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::storage_unavailable("store.json is read-only")
            .with_context("While saving car location");

        assert_eq!(err.code, ErrorCode::StorageUnavailable);
        assert!(err.context.is_some());
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: Error = io.into();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert!(err.source.is_some());
    }

    #[test]
    fn test_report_carries_suggestion() {
        let err = Error::new(ErrorCode::LocationTimeout, "No fix within 10s")
            .with_suggestion("Move to an open area and try again");

        let json = serde_json::to_value(err.to_report()).unwrap();
        assert_eq!(json["code"], "LOCATION_TIMEOUT");
        assert_eq!(json["code_str"], "E5001");
        assert_eq!(json["category"], "Location");
        assert_eq!(json["suggestion"], "Move to an open area and try again");
        assert!(json.get("context").is_none());
    }
}
