//! Persistence of the most recent fix and the saved car position
//!
//! Both records live in single slots of a [`KeyValueStore`] and are replaced
//! wholesale on every write. Caching only saves acquisition time, so storage
//! failures are logged and treated as a miss or a no-op.

use chrono::{DateTime, Utc};
use myco_core::store::{keys, KeyValueStore};
use myco_geo::Coordinate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Maximum age of a cached fix that may be reused
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(5 * 60);

/// A fix together with the time it was obtained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimestampedLocation {
    /// Where the device was
    #[serde(rename = "location")]
    pub coordinate: Coordinate,
    /// Epoch milliseconds at capture
    #[serde(rename = "timestamp")]
    pub captured_at_millis: i64,
}

impl TimestampedLocation {
    pub fn new(coordinate: Coordinate, captured_at_millis: i64) -> Self {
        Self {
            coordinate,
            captured_at_millis,
        }
    }

    /// Milliseconds elapsed between capture and `now_millis`
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis.saturating_sub(self.captured_at_millis)
    }
}

/// The position the user parked at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarLocation {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// When the user saved it; serialized as ISO-8601
    #[serde(rename = "timestamp")]
    pub saved_at: DateTime<Utc>,
}

impl CarLocation {
    pub fn new(coordinate: Coordinate, saved_at: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            saved_at,
        }
    }

    /// ISO-8601 rendering of [`CarLocation::saved_at`]
    pub fn saved_at_iso(&self) -> String {
        self.saved_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }
}

/// Returns true while `entry` is younger than `max_age_millis`.
///
/// ```
/// use myco_geo::Coordinate;
/// use myco_location::cache::{is_fresh, TimestampedLocation};
///
/// let entry = TimestampedLocation::new(Coordinate::new(45.76, 4.83), 1_000);
/// assert!(is_fresh(&entry, 1_000 + 299_999, 300_000));
/// assert!(!is_fresh(&entry, 1_000 + 300_001, 300_000));
/// ```
pub fn is_fresh(entry: &TimestampedLocation, now_millis: i64, max_age_millis: i64) -> bool {
    now_millis.saturating_sub(entry.captured_at_millis) < max_age_millis
}

/// Owner of the last-location and car-location slots
#[derive(Clone)]
pub struct LocationCache {
    store: Arc<dyn KeyValueStore>,
}

impl LocationCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The persisted fix, or `None` when missing, unreadable or corrupt
    pub fn load_cached_location(&self) -> Option<TimestampedLocation> {
        self.read(keys::LAST_LOCATION)
            .filter(|entry: &TimestampedLocation| valid_entry(keys::LAST_LOCATION, &entry.coordinate))
    }

    /// The persisted fix if it is still fresh at `now_millis`
    pub fn fresh_location(&self, now_millis: i64, max_age: Duration) -> Option<TimestampedLocation> {
        let entry = self.load_cached_location()?;
        let max_age_millis = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        if is_fresh(&entry, now_millis, max_age_millis) {
            Some(entry)
        } else {
            debug!(age_ms = entry.age_millis(now_millis), "Cached fix is stale");
            None
        }
    }

    /// Replace the persisted fix
    pub fn store_location(&self, location: &TimestampedLocation) {
        self.write(keys::LAST_LOCATION, location);
    }

    /// The saved car position, if any and in range
    pub fn load_car_location(&self) -> Option<CarLocation> {
        self.read(keys::CAR_LOCATION)
            .filter(|car: &CarLocation| valid_entry(keys::CAR_LOCATION, &car.coordinate))
    }

    /// Replace the saved car position; `false` when it could not be persisted
    pub fn store_car_location(&self, location: &CarLocation) -> bool {
        let saved = self.write(keys::CAR_LOCATION, location);
        if saved {
            info!(
                latitude = location.coordinate.latitude,
                longitude = location.coordinate.longitude,
                "Car location saved"
            );
        }
        saved
    }

    /// Forget the saved car position
    pub fn delete_car_location(&self) {
        match self.store.remove(keys::CAR_LOCATION) {
            Ok(()) => info!("Car location deleted"),
            Err(e) => warn!(key = keys::CAR_LOCATION, error = %e, "Failed to delete entry"),
        }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Failed to read entry, treating as missing");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Corrupt entry, treating as missing");
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode entry");
                return false;
            }
        };
        match self.store.set(key, &encoded) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Failed to write entry");
                false
            }
        }
    }
}

fn valid_entry(key: &str, coordinate: &Coordinate) -> bool {
    let valid = coordinate.is_valid();
    if !valid {
        warn!(key, "Discarding entry with invalid coordinate");
    }
    valid
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use myco_core::store::{FileStore, MemoryStore};
    use myco_core::{Error, Result};

    /// A store whose every operation fails
    pub(crate) struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::storage_unavailable("disk gone"))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::storage_unavailable("disk gone"))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(Error::storage_unavailable("disk gone"))
        }
    }

    fn cache() -> (Arc<MemoryStore>, LocationCache) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), LocationCache::new(store))
    }

    fn fix(lat: f64, lon: f64, at: i64) -> TimestampedLocation {
        TimestampedLocation::new(Coordinate::new(lat, lon), at)
    }

    #[test]
    fn test_freshness_boundary() {
        let t = 1_700_000_000_000;
        let entry = fix(45.0, 4.0, t);
        assert!(is_fresh(&entry, t + 299_999, 300_000));
        assert!(!is_fresh(&entry, t + 300_000, 300_000));
        assert!(!is_fresh(&entry, t + 300_001, 300_000));
    }

    #[test]
    fn test_empty_cache() {
        let (_, cache) = cache();
        assert!(cache.load_cached_location().is_none());
        assert!(cache.load_car_location().is_none());
    }

    #[test]
    fn test_store_overwrites() {
        let (store, cache) = cache();
        let first = fix(45.0, 4.0, 1_000);
        let second = fix(46.0, 5.0, 2_000);

        cache.store_location(&first);
        cache.store_location(&second);

        assert_eq!(cache.load_cached_location(), Some(second));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_persisted_shape() {
        let (store, cache) = cache();
        cache.store_location(&fix(45.5, 4.5, 1_234));

        let raw = store.get(keys::LAST_LOCATION).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["timestamp"], 1_234);
        assert_eq!(json["location"]["latitude"], 45.5);
    }

    #[test]
    fn test_corrupt_entry_is_absent() {
        let (store, cache) = cache();
        store.set(keys::LAST_LOCATION, "{not json").unwrap();
        assert!(cache.load_cached_location().is_none());

        store.set(keys::CAR_LOCATION, r#"{"latitude": "north"}"#).unwrap();
        assert!(cache.load_car_location().is_none());
    }

    #[test]
    fn test_out_of_range_entry_is_absent() {
        let (store, cache) = cache();
        store
            .set(
                keys::LAST_LOCATION,
                r#"{"location": {"latitude": 123.0, "longitude": 4.0}, "timestamp": 1}"#,
            )
            .unwrap();
        assert!(cache.load_cached_location().is_none());
    }

    #[test]
    fn test_out_of_range_car_is_absent() {
        let (store, cache) = cache();
        store
            .set(
                keys::CAR_LOCATION,
                r#"{"latitude": 123.0, "longitude": 4.0, "timestamp": "2024-09-21T08:15:30.000Z"}"#,
            )
            .unwrap();
        assert!(cache.load_car_location().is_none());
    }

    #[test]
    fn test_slots_recover_from_corrupt_store_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("store.json");
        std::fs::write(&path, "{truncated").unwrap();

        let cache = LocationCache::new(Arc::new(FileStore::new(&path)));
        assert!(cache.load_car_location().is_none());

        let car = CarLocation::new(Coordinate::new(45.0, 4.0), Utc::now());
        assert!(cache.store_car_location(&car));
        cache.store_location(&fix(46.0, 5.0, 1));

        assert_eq!(cache.load_car_location(), Some(car));
        assert_eq!(cache.load_cached_location(), Some(fix(46.0, 5.0, 1)));
    }

    #[test]
    fn test_fresh_location() {
        let (_, cache) = cache();
        cache.store_location(&fix(45.0, 4.0, 10_000));

        assert!(cache.fresh_location(10_000 + 299_999, DEFAULT_MAX_AGE).is_some());
        assert!(cache.fresh_location(10_000 + 300_001, DEFAULT_MAX_AGE).is_none());
    }

    #[test]
    fn test_car_lifecycle() {
        let (_, cache) = cache();
        let saved_at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let x = CarLocation::new(Coordinate::new(45.0, 4.0), saved_at);
        let y = CarLocation::new(Coordinate::new(46.0, 5.0).with_accuracy(7.0), saved_at);

        cache.store_car_location(&x);
        assert_eq!(cache.load_car_location(), Some(x));

        cache.delete_car_location();
        assert!(cache.load_car_location().is_none());

        cache.store_car_location(&x);
        cache.store_car_location(&y);
        assert_eq!(cache.load_car_location(), Some(y));
    }

    #[test]
    fn test_car_slot_independent_of_fix_slot() {
        let (_, cache) = cache();
        let car = CarLocation::new(Coordinate::new(45.0, 4.0), Utc::now());
        cache.store_car_location(&car);
        cache.store_location(&fix(46.0, 5.0, 1));
        cache.delete_car_location();

        assert!(cache.load_cached_location().is_some());
    }

    #[test]
    fn test_car_reads_iso_timestamp() {
        let (store, cache) = cache();
        store
            .set(
                keys::CAR_LOCATION,
                r#"{"latitude": 45.1, "longitude": 4.2, "timestamp": "2024-09-21T08:15:30.000Z"}"#,
            )
            .unwrap();

        let car = cache.load_car_location().unwrap();
        assert_eq!(car.coordinate, Coordinate::new(45.1, 4.2));
        assert_eq!(car.saved_at_iso(), "2024-09-21T08:15:30.000Z");
    }

    #[test]
    fn test_storage_failures_are_absorbed() {
        let cache = LocationCache::new(Arc::new(BrokenStore));
        cache.store_location(&fix(45.0, 4.0, 1));
        assert!(cache.load_cached_location().is_none());

        assert!(!cache.store_car_location(&CarLocation::new(Coordinate::new(45.0, 4.0), Utc::now())));
        cache.delete_car_location();
        assert!(cache.load_car_location().is_none());
    }
}
