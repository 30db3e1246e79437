//! Settings system for fireo-rs.
//!
//! This module provides the [`Settings`] struct, which holds the connection
//! and runtime configuration, and [`LazySettings`], a globally-accessible,
//! lazily-initialized settings instance.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Document database connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// The cloud project that owns the database.
    pub project_id: String,
    /// The database id within the project.
    pub database_id: String,
    /// Host of a local emulator (e.g. `localhost:8080`). When set, credentials are ignored.
    pub emulator_host: Option<String>,
    /// Path to a service-account credentials file.
    pub credentials_path: Option<PathBuf>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database_id: "(default)".to_string(),
            emulator_host: None,
            credentials_path: None,
        }
    }
}

impl DatabaseSettings {
    /// Returns `true` when the settings point at a local emulator.
    pub const fn uses_emulator(&self) -> bool {
        self.emulator_host.is_some()
    }
}

/// The complete set of fireo-rs settings.
///
/// # Examples
///
/// ```
/// use fireo_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.database.database_id, "(default)");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,

    /// The database connection.
    pub database: DatabaseSettings,

    /// The log level filter (e.g. "info", "fireo_db=debug").
    pub log_level: String,

    /// Number of documents returned by a collection fetch when no limit is given.
    pub default_fetch_limit: usize,

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            database: DatabaseSettings::default(),
            log_level: "info".to_string(),
            default_fetch_limit: 100,
            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup to set the
/// settings, then use [`get`](LazySettings::get) to access them.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Configures the global settings unless they already are.
    ///
    /// Returns `false`, leaving the existing settings in place, if another
    /// caller got there first.
    pub fn try_configure(&self, settings: Settings) -> bool {
        self.inner.set(settings).is_ok()
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns the configured settings, if any.
    pub fn try_get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
