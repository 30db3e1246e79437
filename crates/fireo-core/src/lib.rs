//! # fireo-core
//!
//! Core types, settings, model checks, and error types for fireo-rs.
//! This crate has no ORM dependencies and provides the foundation for the
//! `fireo-db` crate.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Connection and runtime settings
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`checks`] - Diagnostic messages produced by model checks
//! - [`logging`] - Tracing-based logging integration
//! - [`utils`] - Collection naming and document key helpers

pub mod checks;
pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

// Re-export the most commonly used types at the crate root.
pub use checks::{CheckLevel, CheckMessage};
pub use error::{FireoError, FireoResult, ValidationError};
pub use settings::{Settings, SETTINGS};
