//! Shared state for every command: configuration, store and output mode

use anyhow::Context as _;
use myco_core::config::Config;
use myco_core::Error;
use myco_core::preferences::Preferences;
use myco_core::store::{FileStore, KeyValueStore};
use myco_geo::Coordinate;
use myco_location::positioning::{FixedPositioning, PositioningBackend, UnsupportedPositioning};
use myco_location::{AcquireOptions, LocationCache, LocationProvider, LocationSettings};
use myco_telemetry::TelemetryConfig;
use std::sync::Arc;
use tracing::debug;

use crate::PositionArgs;

pub struct Context {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub json: bool,
}

impl Context {
    pub fn init(config_path: Option<&str>, json: bool, verbose: bool) -> anyhow::Result<Self> {
        let config = Config::load(config_path)?;

        let telemetry = &config.schema.telemetry;
        myco_telemetry::init_with_config(TelemetryConfig {
            log_level: if verbose { "debug".to_string() } else { telemetry.log_level.clone() },
            json: telemetry.json,
            ..Default::default()
        })
        .context("Failed to initialize logging")?;

        let path = config.schema.storage.resolved_path();
        debug!(store = %path.display(), config = ?config.path, "Context ready");

        Ok(Self {
            config,
            store: Arc::new(FileStore::new(path)),
            json,
        })
    }

    pub fn cache(&self) -> LocationCache {
        LocationCache::new(Arc::clone(&self.store))
    }

    pub fn preferences(&self) -> Preferences {
        Preferences::new(Arc::clone(&self.store))
    }

    /// Provider backed by the fix given on the command line, if any
    pub fn provider(&self, position: &PositionArgs) -> anyhow::Result<LocationProvider> {
        let backend: Arc<dyn PositioningBackend> = match (position.lat, position.lon) {
            (Some(lat), Some(lon)) => {
                let mut coordinate = Coordinate::try_new(lat, lon)
                    .map_err(|e| Error::validation(e.to_string()))?;
                if let Some(accuracy) = position.accuracy {
                    coordinate = coordinate.with_accuracy(accuracy);
                }
                Arc::new(FixedPositioning::new(coordinate))
            }
            _ => Arc::new(UnsupportedPositioning),
        };

        let settings = LocationSettings::from(&self.config.schema.location);
        Ok(LocationProvider::new(backend, self.cache()).with_settings(settings))
    }

    /// Options for one acquisition; an explicit fix always bypasses the cache
    pub fn acquire_options(&self, position: &PositionArgs) -> AcquireOptions {
        let options = AcquireOptions::default()
            .with_accuracy(position.accuracy_hint(self.config.schema.location.default_accuracy));
        if position.force || position.lat.is_some() {
            options.force_refresh()
        } else {
            options
        }
    }
}
