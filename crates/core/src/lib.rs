//! Core utilities for Myco
//!
//! This crate provides shared functionality used by the location and CLI crates:
//!
//! - **Error handling**: Structured errors with codes, context and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//! - **Storage**: A flat string key-value store with in-memory and file backends
//! - **Preferences**: Language and username persisted in that store
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use myco_core::{config::Config, preferences::Preferences, store::FileStore};
//!
//! let config = Config::load(None).expect("Invalid configuration");
//! let store = Arc::new(FileStore::new(config.schema.storage.resolved_path()));
//!
//! let prefs = Preferences::new(store);
//! println!("Language: {}", prefs.language());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod preferences;
pub mod store;

pub use error::{Error, ErrorCode, ErrorReport, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{AccuracyHint, Config, ConfigSchema, LocationConfig};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result};
    pub use crate::preferences::{Language, Preferences};
    pub use crate::store::{keys, FileStore, KeyValueStore, MemoryStore};
}
