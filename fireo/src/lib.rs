//! # fireo
//!
//! A declarative object-document mapper for document databases.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `fireo` to get everything, or on `fireo-core` and
//! `fireo-db` individually.

/// Settings, errors, checks, logging, and key helpers.
pub use fireo_core as core;

/// Models, field descriptors, validators, and document stores.
#[cfg(feature = "db")]
pub use fireo_db as db;

pub use fireo_core::{FireoError, FireoResult, Settings, SETTINGS};

// Re-export commonly used third-party crates.
pub use async_trait;
pub use chrono;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
pub use tracing_subscriber;

use fireo_core::checks::check_settings;
use fireo_core::logging::setup_logging;

/// Installs the global settings and logging.
///
/// Configuration warnings are logged, not returned. Fails if settings were
/// already installed.
pub fn init(settings: Settings) -> FireoResult<()> {
    if !SETTINGS.try_configure(settings) {
        return Err(FireoError::ConfigurationError(
            "settings have already been configured".to_string(),
        ));
    }
    let settings = SETTINGS.try_get().ok_or_else(|| {
        FireoError::ConfigurationError("settings were not installed".to_string())
    })?;
    setup_logging(settings);
    for message in check_settings(settings) {
        tracing::warn!(id = message.id.as_deref().unwrap_or(""), "{}", message.msg);
    }
    tracing::info!(
        project_id = %settings.database.project_id,
        database_id = %settings.database.database_id,
        emulator = settings.database.uses_emulator(),
        "fireo initialized"
    );
    Ok(())
}

/// Commonly used types, for glob import.
///
/// ```
/// use fireo::prelude::*;
///
/// let field = FieldDef::list("subjects").column_name("subs");
/// assert_eq!(field.storage_key(), "subs");
/// ```
#[cfg(feature = "db")]
pub mod prelude {
    pub use fireo_core::{FireoError, FireoResult, Settings};
    pub use fireo_db::validators::{
        EachValidator, FnValidator, MaxLengthValidator, MaxValueValidator, MinLengthValidator,
        MinValueValidator, Validator,
    };
    pub use fireo_db::{
        Collection, Document, DocumentStore, FieldDef, FieldType, InMemoryStore, Instance, Model,
        ModelMeta, Value,
    };
}
