//! Field validators.
//!
//! Validators enforce constraints on field values when they are assigned to
//! a model instance. A field may carry any number of validators; they run in
//! the order they were attached, after the field's own type check.

use crate::value::Value;
use fireo_core::{FireoError, ValidationError};
use std::fmt;

/// A trait for validating field values.
///
/// Validators are attached to [`FieldDef`](crate::fields::FieldDef) instances
/// and called whenever a value is assigned. Each validator checks a single
/// constraint and returns an error if the value does not satisfy it.
///
/// # Examples
///
/// ```
/// use fireo_db::validators::{Validator, MaxLengthValidator};
/// use fireo_db::value::Value;
///
/// let v = MaxLengthValidator::new(2);
/// assert!(v.validate(&Value::from(["a", "b"])).is_ok());
/// assert!(v.validate(&Value::from(["a", "b", "c"])).is_err());
/// ```
pub trait Validator: Send + Sync + fmt::Debug {
    /// Validates the given value, returning an error if invalid.
    fn validate(&self, value: &Value) -> Result<(), FireoError>;

    /// Returns a human-readable name for this validator.
    fn name(&self) -> &str;
}

fn invalid(message: String, code: &str) -> FireoError {
    FireoError::ValidationError(ValidationError::new(message, code))
}

/// Returns the length of strings (in characters), lists, and maps.
fn value_len(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::List(items) => Some(items.len()),
        Value::Map(map) => Some(map.len()),
        _ => None,
    }
}

/// Names what [`value_len`] counts for this value.
const fn len_unit(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "characters",
        Value::Map(_) => "entries",
        _ => "elements",
    }
}

#[allow(clippy::cast_precision_loss)]
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

/// A predicate supplied as a closure.
pub type Predicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// Validates a value with a user-supplied predicate.
///
/// This is the "validator callable" of a field: the predicate returns `true`
/// to accept the value.
///
/// # Examples
///
/// ```
/// use fireo_db::validators::{FnValidator, Validator};
/// use fireo_db::value::Value;
///
/// let non_empty = FnValidator::new("non_empty", |v| v.as_list().is_some_and(|l| !l.is_empty()))
///     .with_message("At least one subject is required.");
/// assert!(non_empty.validate(&Value::from(["Math"])).is_ok());
/// let err = non_empty.validate(&Value::from(Vec::<Value>::new())).unwrap_err();
/// assert!(err.to_string().contains("At least one subject"));
/// ```
pub struct FnValidator {
    name: String,
    message: String,
    predicate: Predicate,
}

impl FnValidator {
    /// Creates a validator from a name and a predicate.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            message: "Invalid value.".to_string(),
            predicate: Box::new(predicate),
        }
    }

    /// Sets the message reported when the predicate rejects a value.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Debug for FnValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl Validator for FnValidator {
    fn validate(&self, value: &Value) -> Result<(), FireoError> {
        if (self.predicate)(value) {
            Ok(())
        } else {
            Err(FireoError::ValidationError(
                ValidationError::new(self.message.clone(), "validator")
                    .with_param("validator", self.name.clone()),
            ))
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Validates that a string, list, or map does not exceed a maximum length.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    /// The maximum allowed length.
    pub max_length: usize,
}

impl MaxLengthValidator {
    /// Creates a new `MaxLengthValidator` with the given maximum length.
    pub const fn new(max_length: usize) -> Self {
        Self { max_length }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &Value) -> Result<(), FireoError> {
        match value_len(value) {
            Some(len) if len > self.max_length => Err(invalid(
                format!(
                    "Ensure this value has at most {} {} (it has {len}).",
                    self.max_length,
                    len_unit(value)
                ),
                "max_length",
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MaxLengthValidator"
    }
}

/// Validates that a string, list, or map meets a minimum length.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    /// The minimum required length.
    pub min_length: usize,
}

impl MinLengthValidator {
    /// Creates a new `MinLengthValidator` with the given minimum length.
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &Value) -> Result<(), FireoError> {
        match value_len(value) {
            Some(len) if len < self.min_length => Err(invalid(
                format!(
                    "Ensure this value has at least {} {} (it has {len}).",
                    self.min_length,
                    len_unit(value)
                ),
                "min_length",
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MinLengthValidator"
    }
}

/// Validates that a numeric value does not exceed a maximum.
#[derive(Debug, Clone)]
pub struct MaxValueValidator {
    /// The maximum allowed value.
    pub max_value: f64,
}

impl MaxValueValidator {
    /// Creates a new `MaxValueValidator` with the given maximum.
    pub fn new(max_value: f64) -> Self {
        Self { max_value }
    }
}

impl Validator for MaxValueValidator {
    fn validate(&self, value: &Value) -> Result<(), FireoError> {
        match numeric(value) {
            Some(n) if n > self.max_value => Err(invalid(
                format!(
                    "Ensure this value is less than or equal to {}.",
                    self.max_value
                ),
                "max_value",
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MaxValueValidator"
    }
}

/// Validates that a numeric value meets a minimum.
#[derive(Debug, Clone)]
pub struct MinValueValidator {
    /// The minimum required value.
    pub min_value: f64,
}

impl MinValueValidator {
    /// Creates a new `MinValueValidator` with the given minimum.
    pub fn new(min_value: f64) -> Self {
        Self { min_value }
    }
}

impl Validator for MinValueValidator {
    fn validate(&self, value: &Value) -> Result<(), FireoError> {
        match numeric(value) {
            Some(n) if n < self.min_value => Err(invalid(
                format!(
                    "Ensure this value is greater than or equal to {}.",
                    self.min_value
                ),
                "min_value",
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "MinValueValidator"
    }
}

/// Applies an inner validator to every element of a list.
///
/// Non-list values pass through untouched.
#[derive(Debug)]
pub struct EachValidator {
    inner: Box<dyn Validator>,
}

impl EachValidator {
    /// Wraps `inner` so it is applied per element.
    pub fn new(inner: impl Validator + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl Validator for EachValidator {
    fn validate(&self, value: &Value) -> Result<(), FireoError> {
        let Some(items) = value.as_list() else {
            return Ok(());
        };
        for (index, item) in items.iter().enumerate() {
            self.inner.validate(item).map_err(|err| match err {
                FireoError::ValidationError(e) => {
                    FireoError::ValidationError(e.with_param("index", index.to_string()))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "EachValidator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_length_string_and_list() {
        let v = MaxLengthValidator::new(3);
        assert!(v.validate(&Value::from("abc")).is_ok());
        assert!(v.validate(&Value::from("abcd")).is_err());
        assert!(v.validate(&Value::from([1, 2, 3])).is_ok());
        assert!(v.validate(&Value::from([1, 2, 3, 4])).is_err());
    }

    #[test]
    fn test_max_length_counts_chars() {
        let v = MaxLengthValidator::new(2);
        assert!(v.validate(&Value::from("éé")).is_ok());
    }

    #[test]
    fn test_length_messages_name_the_unit() {
        let max = MaxLengthValidator::new(2);
        let err = max.validate(&Value::from("abc")).unwrap_err();
        assert!(err.to_string().contains("at most 2 characters (it has 3)"));
        let err = max.validate(&Value::from(["a", "b", "c"])).unwrap_err();
        assert!(err.to_string().contains("at most 2 elements (it has 3)"));

        let min = MinLengthValidator::new(2);
        let err = min.validate(&Value::map([("k", 1)])).unwrap_err();
        assert!(err.to_string().contains("at least 2 entries (it has 1)"));
    }

    #[test]
    fn test_max_length_non_sized() {
        let v = MaxLengthValidator::new(0);
        assert!(v.validate(&Value::Int(12345)).is_ok());
    }

    #[test]
    fn test_min_length() {
        let v = MinLengthValidator::new(1);
        assert!(v.validate(&Value::from(["a"])).is_ok());
        assert!(v.validate(&Value::from(Vec::<Value>::new())).is_err());
    }

    #[test]
    fn test_value_bounds() {
        let max = MaxValueValidator::new(100.0);
        assert!(max.validate(&Value::Int(100)).is_ok());
        assert!(max.validate(&Value::Float(100.1)).is_err());

        let min = MinValueValidator::new(0.0);
        assert!(min.validate(&Value::Int(0)).is_ok());
        assert!(min.validate(&Value::Int(-1)).is_err());
        assert!(min.validate(&Value::from("text")).is_ok());
    }

    #[test]
    fn test_fn_validator() {
        let v = FnValidator::new("even", |v| v.as_int().is_some_and(|i| i % 2 == 0));
        assert!(v.validate(&Value::Int(4)).is_ok());
        let err = v.validate(&Value::Int(3)).unwrap_err();
        match err {
            FireoError::ValidationError(e) => {
                assert_eq!(e.code, "validator");
                assert_eq!(e.message, "Invalid value.");
                assert_eq!(e.params.get("validator").unwrap(), "even");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(v.name(), "even");
    }

    #[test]
    fn test_each_validator_reports_index() {
        let v = EachValidator::new(MaxLengthValidator::new(4));
        assert!(v.validate(&Value::from(["Math", "Art"])).is_ok());
        let err = v.validate(&Value::from(["Math", "English"])).unwrap_err();
        match err {
            FireoError::ValidationError(e) => assert_eq!(e.params.get("index").unwrap(), "1"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(v.validate(&Value::from("not a list")).is_ok());
    }

    #[test]
    fn test_validator_names() {
        assert_eq!(MaxLengthValidator::new(5).name(), "MaxLengthValidator");
        assert_eq!(MinLengthValidator::new(5).name(), "MinLengthValidator");
        assert_eq!(MaxValueValidator::new(5.0).name(), "MaxValueValidator");
        assert_eq!(MinValueValidator::new(5.0).name(), "MinValueValidator");
        assert_eq!(EachValidator::new(MinLengthValidator::new(1)).name(), "EachValidator");
    }
}
