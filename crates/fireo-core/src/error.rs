//! Core error types for fireo-rs.
//!
//! This module provides the [`FireoError`] enum covering validation, model
//! definition, document key, store, and configuration failures, along with
//! the structured [`ValidationError`] carried by validation failures.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Represents a validation error with optional field-level errors.
///
/// Validation errors can be either simple (a single message) or compound
/// (containing per-field error lists, as produced when a nested model fails
/// validation).
///
/// # Examples
///
/// ```
/// use fireo_core::error::ValidationError;
///
/// // Simple validation error
/// let err = ValidationError::new("Value is not a list.", "invalid_type");
///
/// // Field-level validation errors
/// let mut field_errors = std::collections::HashMap::new();
/// field_errors.insert(
///     "street".to_string(),
///     vec![ValidationError::new("Ensure this value has at most 10 characters.", "max_length")],
/// );
/// let err = ValidationError::with_field_errors(field_errors);
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the type of validation failure (e.g. "invalid_type", "validator").
    pub code: String,
    /// Additional parameters providing context for the error message.
    pub params: HashMap<String, String>,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: HashMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            params: HashMap::new(),
            field_errors: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            params: HashMap::new(),
            field_errors,
        }
    }

    /// Adds a parameter to this validation error.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns the name of the field this error was raised for, if recorded.
    pub fn field(&self) -> Option<&str> {
        self.params.get("field").map(String::as_str)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            write!(f, "{}", self.message)?;
        } else if !self.field_errors.is_empty() {
            let mut fields: Vec<_> = self.field_errors.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));
            let mut first = true;
            for (field, errors) in fields {
                for error in errors {
                    if !first {
                        write!(f, "; ")?;
                    }
                    write!(f, "{field}: {error}")?;
                    first = false;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for fireo-rs.
#[derive(Error, Debug)]
pub enum FireoError {
    // ── Validation ───────────────────────────────────────────────────

    /// A value failed a field's type check or one of its validators.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    /// A required field had no value (and no default) at save time.
    #[error("Field \"{field}\" is required in model {model}")]
    RequiredField {
        /// The model the field belongs to.
        model: String,
        /// The attribute name of the field.
        field: String,
    },

    /// A nested model field received a value that does not match its model.
    #[error("Nested model type error: {0}")]
    NestedModelType(String),

    /// A reference field received a key pointing at the wrong collection.
    #[error("Reference type error: {0}")]
    ReferenceType(String),

    /// An attribute name that the model does not declare.
    #[error("Model {model} has no field \"{field}\"")]
    UnknownField {
        /// The model that was accessed.
        model: String,
        /// The attribute name that was requested.
        field: String,
    },

    // ── Documents ────────────────────────────────────────────────────

    /// A malformed document key, or one belonging to another collection.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// A document lookup found nothing.
    #[error("Document does not exist: {0}")]
    DoesNotExist(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A model definition is inconsistent (duplicate storage keys, etc.).
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ValidationError> for FireoError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

impl FireoError {
    /// Returns `true` for errors caused by a field value rather than by
    /// the model definition or the store.
    pub const fn is_value_error(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::RequiredField { .. }
                | Self::NestedModelType(_)
                | Self::ReferenceType(_)
        )
    }
}

/// A convenience type alias for `Result<T, FireoError>`.
pub type FireoResult<T> = Result<T, FireoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_simple() {
        let err = ValidationError::new("Value is not a list.", "invalid_type");
        assert_eq!(err.to_string(), "Value is not a list.");
    }

    #[test]
    fn test_validation_error_display_field_errors() {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "street".to_string(),
            vec![ValidationError::new("Too long.", "max_length")],
        );
        field_errors.insert(
            "city".to_string(),
            vec![ValidationError::new("Missing.", "required")],
        );
        let err = ValidationError::with_field_errors(field_errors);
        assert_eq!(err.to_string(), "city: Missing.; street: Too long.");
    }

    #[test]
    fn test_validation_error_with_param() {
        let err = ValidationError::new("Too short.", "min_length").with_param("min", "8");
        assert_eq!(err.params.get("min").unwrap(), "8");
        assert!(err.field().is_none());
    }

    #[test]
    fn test_validation_error_field() {
        let err = ValidationError::new("Bad.", "validator").with_param("field", "subjects");
        assert_eq!(err.field(), Some("subjects"));
    }

    #[test]
    fn test_required_field_display() {
        let err = FireoError::RequiredField {
            model: "User".into(),
            field: "name".into(),
        };
        assert_eq!(err.to_string(), "Field \"name\" is required in model User");
    }

    #[test]
    fn test_is_value_error() {
        assert!(FireoError::from(ValidationError::new("x", "y")).is_value_error());
        assert!(FireoError::ReferenceType("x".into()).is_value_error());
        assert!(!FireoError::DoesNotExist("x".into()).is_value_error());
        assert!(!FireoError::ImproperlyConfigured("x".into()).is_value_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: FireoError = io_err.into();
        assert!(err.to_string().contains("file missing"));
        assert!(!err.is_value_error());
    }
}
