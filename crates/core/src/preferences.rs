//! User preferences persisted in the key-value store
//!
//! Reads fall back to defaults and failed writes are logged, never surfaced;
//! a broken store must not stop the app from starting.

use crate::store::{keys, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// Username shown when none has been saved
pub const DEFAULT_USERNAME: &str = "Utilisateur";

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// French
    #[default]
    Fr,
    /// English
    En,
}

impl Language {
    /// Storage and display code
    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            other => Err(crate::Error::validation(format!("Unsupported language: {other}"))
                .with_suggestion("Use 'fr' or 'en'")),
        }
    }
}

/// Accessor for the language and username slots
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    /// Preferences backed by `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Saved language; unknown or unreadable values yield the default
    pub fn language(&self) -> Language {
        match self.store.get(keys::LANGUAGE) {
            Ok(Some(code)) => code.parse().unwrap_or_default(),
            Ok(None) => Language::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read language preference");
                Language::default()
            }
        }
    }

    /// Persist the language
    pub fn set_language(&self, language: Language) {
        if let Err(e) = self.store.set(keys::LANGUAGE, language.code()) {
            warn!(error = %e, "Failed to save language preference");
        }
    }

    /// Saved username or [`DEFAULT_USERNAME`]
    pub fn username(&self) -> String {
        match self.store.get(keys::USERNAME) {
            Ok(Some(name)) if !name.trim().is_empty() => name,
            Ok(_) => DEFAULT_USERNAME.to_string(),
            Err(e) => {
                warn!(error = %e, "Failed to read username");
                DEFAULT_USERNAME.to_string()
            }
        }
    }

    /// Persist the username, trimmed
    pub fn set_username(&self, name: &str) {
        if let Err(e) = self.store.set(keys::USERNAME, name.trim()) {
            warn!(error = %e, "Failed to save username");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn prefs() -> (Arc<MemoryStore>, Preferences) {
        let store = Arc::new(MemoryStore::new());
        let prefs = Preferences::new(store.clone());
        (store, prefs)
    }

    #[test]
    fn test_language_defaults_to_french() {
        let (_, prefs) = prefs();
        assert_eq!(prefs.language(), Language::Fr);
    }

    #[test]
    fn test_language_roundtrip() {
        let (store, prefs) = prefs();
        prefs.set_language(Language::En);
        assert_eq!(prefs.language(), Language::En);
        assert_eq!(store.get(keys::LANGUAGE).unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let (store, prefs) = prefs();
        store.set(keys::LANGUAGE, "de").unwrap();
        assert_eq!(prefs.language(), Language::Fr);
    }

    #[test]
    fn test_username_default_and_trim() {
        let (_, prefs) = prefs();
        assert_eq!(prefs.username(), DEFAULT_USERNAME);

        prefs.set_username("  Girolle ");
        assert_eq!(prefs.username(), "Girolle");

        prefs.set_username("   ");
        assert_eq!(prefs.username(), DEFAULT_USERNAME);
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert!("xx".parse::<Language>().is_err());
    }
}
