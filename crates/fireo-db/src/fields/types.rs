//! Field type definitions.
//!
//! Each [`FieldType`] variant corresponds to one kind of field a model can
//! declare, and [`FieldDef`] captures all metadata about a single field.
//! A `FieldDef` mediates between the value held in an instance slot and the
//! value written under its storage key.

use std::collections::HashMap;

use crate::instance::Instance;
use crate::model::ModelMeta;
use crate::validators::{FnValidator, MaxLengthValidator, Validator};
use crate::value::Value;
use fireo_core::utils::text::{is_valid_id, split_key};
use fireo_core::{FireoError, FireoResult, ValidationError};

/// Accessor for another model's metadata, used by reference and nested fields.
pub type MetaFn = fn() -> &'static ModelMeta;

/// The kind of a model field, determining which values it accepts.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// The document id. Never written as a document field.
    Id,
    /// A UTF-8 string.
    Text {
        /// Maximum length in characters.
        max_length: Option<usize>,
        /// Lowercase values on assignment.
        to_lowercase: bool,
    },
    /// An integer or floating-point number.
    Number {
        /// Reject floats.
        int_only: bool,
        /// Reject integers.
        float_only: bool,
    },
    /// A boolean.
    Boolean,
    /// A UTC timestamp.
    DateTime,
    /// An ordered sequence of values of any type.
    List,
    /// A string-keyed map of values of any type.
    Map,
    /// The key of a document in another model's collection.
    Reference {
        /// The referenced model.
        to: MetaFn,
    },
    /// A model embedded as a map inside the owning document.
    Nested {
        /// The embedded model.
        model: MetaFn,
    },
}

impl FieldType {
    /// A text field with no length limit or normalization.
    pub const fn text() -> Self {
        Self::Text {
            max_length: None,
            to_lowercase: false,
        }
    }

    /// A number field accepting both integers and floats.
    pub const fn number() -> Self {
        Self::Number {
            int_only: false,
            float_only: false,
        }
    }

    /// Returns `true` for the id field.
    pub const fn is_id(&self) -> bool {
        matches!(self, Self::Id)
    }

    /// Returns the conventional field-class name of this variant.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Id => "IDField",
            Self::Text { .. } => "TextField",
            Self::Number { .. } => "NumberField",
            Self::Boolean => "BooleanField",
            Self::DateTime => "DateTime",
            Self::List => "ListField",
            Self::Map => "MapField",
            Self::Reference { .. } => "ReferenceField",
            Self::Nested { .. } => "NestedModel",
        }
    }

    const fn expected(&self) -> &'static str {
        match self {
            Self::Id | Self::Text { .. } => "a string",
            Self::Number { .. } => "a number",
            Self::Boolean => "a bool",
            Self::DateTime => "a datetime",
            Self::List => "a list",
            Self::Map | Self::Nested { .. } => "a map",
            Self::Reference { .. } => "a reference",
        }
    }
}

/// Complete definition of a model field.
///
/// Only the attribute name and type are required; the remaining options are
/// set with builder methods.
///
/// # Examples
///
/// ```
/// use fireo_db::fields::FieldDef;
/// use fireo_db::value::Value;
///
/// let subjects = FieldDef::list("subjects")
///     .column_name("subs")
///     .default(Value::from(Vec::<Value>::new()));
/// assert_eq!(subjects.storage_key(), "subs");
/// assert_eq!(subjects.read(None), Value::List(vec![]));
/// ```
#[derive(Debug)]
pub struct FieldDef {
    /// The attribute name of this field on the model.
    pub name: &'static str,
    /// The storage key used instead of `name`, if set.
    pub column_name: Option<String>,
    /// The kind of this field.
    pub field_type: FieldType,
    /// Value read (and persisted) while the field is unset.
    pub default: Option<Value>,
    /// Whether saving without a value (or default) is an error.
    pub required: bool,
    /// Validators run on every assignment, in order.
    pub validators: Vec<Box<dyn Validator>>,
}

impl FieldDef {
    /// Creates a new `FieldDef` with no default, not required, and no validators.
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            column_name: None,
            field_type,
            default: None,
            required: false,
            validators: Vec::new(),
        }
    }

    /// An id field.
    pub fn id(name: &'static str) -> Self {
        Self::new(name, FieldType::Id)
    }

    /// A text field.
    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldType::text())
    }

    /// A number field.
    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldType::number())
    }

    /// A boolean field.
    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// A timestamp field.
    pub fn datetime(name: &'static str) -> Self {
        Self::new(name, FieldType::DateTime)
    }

    /// A list field.
    pub fn list(name: &'static str) -> Self {
        Self::new(name, FieldType::List)
    }

    /// A map field.
    pub fn map(name: &'static str) -> Self {
        Self::new(name, FieldType::Map)
    }

    /// A reference to a document of another model.
    pub fn reference(name: &'static str, to: MetaFn) -> Self {
        Self::new(name, FieldType::Reference { to })
    }

    /// An embedded model.
    pub fn nested(name: &'static str, model: MetaFn) -> Self {
        Self::new(name, FieldType::Nested { model })
    }

    /// Sets the storage key.
    #[must_use]
    pub fn column_name(mut self, column: impl Into<String>) -> Self {
        self.column_name = Some(column.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Marks this field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attaches a predicate validator; the predicate returns `true` to accept.
    #[must_use]
    pub fn validator<F>(self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let name = format!("{}_validator", self.name);
        self.add_validator(FnValidator::new(name, predicate))
    }

    /// Attaches any [`Validator`].
    #[must_use]
    pub fn add_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Limits the length of the value.
    ///
    /// On text fields this is the variant's own limit; on other fields a
    /// [`MaxLengthValidator`] is attached.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        if let FieldType::Text { max_length, .. } = &mut self.field_type {
            *max_length = Some(max);
            self
        } else {
            self.add_validator(MaxLengthValidator::new(max))
        }
    }

    /// Lowercases text on assignment. Has no effect on other field kinds.
    #[must_use]
    pub fn to_lowercase(mut self) -> Self {
        if let FieldType::Text { to_lowercase, .. } = &mut self.field_type {
            *to_lowercase = true;
        }
        self
    }

    /// Rejects floats. Has no effect on non-number fields.
    #[must_use]
    pub fn int_only(mut self) -> Self {
        if let FieldType::Number { int_only, .. } = &mut self.field_type {
            *int_only = true;
        }
        self
    }

    /// Rejects integers. Has no effect on non-number fields.
    #[must_use]
    pub fn float_only(mut self) -> Self {
        if let FieldType::Number { float_only, .. } = &mut self.field_type {
            *float_only = true;
        }
        self
    }

    /// Returns the key this field is stored under.
    pub fn storage_key(&self) -> &str {
        self.column_name.as_deref().unwrap_or(self.name)
    }

    /// Returns the value read while the field is unset and has no default.
    pub const fn empty_value(&self) -> Value {
        match self.field_type {
            FieldType::List => Value::List(Vec::new()),
            _ => Value::Null,
        }
    }

    /// Reads the field given the instance's assigned value, if any.
    pub fn read(&self, assigned: Option<&Value>) -> Value {
        assigned
            .or(self.default.as_ref())
            .cloned()
            .unwrap_or_else(|| self.empty_value())
    }

    /// Type checks, normalizes, and validates a candidate value.
    ///
    /// Returns the value to store in the instance slot.
    pub fn clean(&self, value: Value) -> FireoResult<Value> {
        let value = self.check_type(value)?;
        for validator in &self.validators {
            validator.validate(&value).map_err(|err| self.tag(err))?;
        }
        Ok(value)
    }

    /// Resolves the value written under [`storage_key`](Self::storage_key).
    ///
    /// The assigned value wins over the default. A required field with
    /// neither fails with [`FireoError::RequiredField`]; an optional one is
    /// written as `Null`.
    pub fn persist(&self, model: &ModelMeta, assigned: Option<&Value>) -> FireoResult<Value> {
        match assigned.or(self.default.as_ref()) {
            None if self.required => Err(FireoError::RequiredField {
                model: model.model_name.to_string(),
                field: self.name.to_string(),
            }),
            None => Ok(Value::Null),
            Some(value) => self.to_storage(value),
        }
    }

    /// Converts a stored value back into an instance slot value.
    ///
    /// `Null` means unset.
    pub fn load(&self, stored: Value) -> FireoResult<Option<Value>> {
        match (&self.field_type, stored) {
            (_, Value::Null) => Ok(None),
            (FieldType::Nested { model }, Value::Map(fields)) => {
                let nested = Instance::from_storage_fields(model(), None, fields)?;
                Ok(Some(Value::Map(nested.assigned_values())))
            }
            (FieldType::Nested { model }, other) => Err(self.nested_error(model(), &other)),
            (_, other) => Ok(Some(other)),
        }
    }

    fn to_storage(&self, value: &Value) -> FireoResult<Value> {
        match (&self.field_type, value) {
            (FieldType::Nested { model }, Value::Map(map)) => {
                let nested = Instance::from_values(model(), map.clone())?;
                Ok(Value::Map(nested.storage_fields()?))
            }
            _ => Ok(value.clone()),
        }
    }

    fn check_type(&self, value: Value) -> FireoResult<Value> {
        match (&self.field_type, value) {
            (FieldType::Id, Value::String(id)) => {
                if is_valid_id(&id) {
                    Ok(Value::String(id))
                } else {
                    Err(self.invalid(format!("\"{id}\" is not a valid document id."), "invalid_id"))
                }
            }
            (
                FieldType::Text {
                    max_length,
                    to_lowercase,
                },
                Value::String(s),
            ) => {
                let s = if *to_lowercase { s.to_lowercase() } else { s };
                if let Some(max) = *max_length {
                    let len = s.chars().count();
                    if len > max {
                        return Err(self.invalid(
                            format!("Ensure this value has at most {max} characters (it has {len})."),
                            "max_length",
                        ));
                    }
                }
                Ok(Value::String(s))
            }
            (FieldType::Number { int_only: true, .. }, Value::Float(_)) => {
                Err(self.invalid("Only integers are allowed.".to_string(), "int_only"))
            }
            (FieldType::Number { float_only: true, .. }, Value::Int(_)) => {
                Err(self.invalid("Only floats are allowed.".to_string(), "float_only"))
            }
            (FieldType::Number { .. }, v @ (Value::Int(_) | Value::Float(_)))
            | (FieldType::Boolean, v @ Value::Bool(_))
            | (FieldType::DateTime, v @ Value::DateTime(_))
            | (FieldType::List, v @ Value::List(_))
            | (FieldType::Map, v @ Value::Map(_)) => Ok(v),
            (FieldType::Reference { to }, Value::Reference(key)) => self.check_reference(to(), key),
            (FieldType::Reference { to }, other) => Err(FireoError::ReferenceType(format!(
                "Field \"{}\" requires a reference to {}, got {}",
                self.name,
                to().model_name,
                other.type_name()
            ))),
            (FieldType::Nested { model }, Value::Map(map)) => self.clean_nested(model(), map),
            (FieldType::Nested { model }, other) => Err(self.nested_error(model(), &other)),
            (field_type, other) => Err(self.invalid(
                format!(
                    "Field \"{}\" expects {}, got {}.",
                    self.name,
                    field_type.expected(),
                    other.type_name()
                ),
                "invalid_type",
            )),
        }
    }

    fn check_reference(&self, target: &ModelMeta, key: String) -> FireoResult<Value> {
        let collection = split_key(&key).map(|(collection, _)| collection.to_string());
        match collection {
            Some(collection) if collection == target.collection_name => Ok(Value::Reference(key)),
            Some(collection) => Err(FireoError::ReferenceType(format!(
                "Invalid reference type. Field \"{}\" requires a {} document, got a key in collection \"{collection}\"",
                self.name, target.model_name
            ))),
            None => Err(FireoError::InvalidKey(format!(
                "\"{key}\" is not a document key"
            ))),
        }
    }

    fn clean_nested(
        &self,
        model: &'static ModelMeta,
        map: indexmap::IndexMap<String, Value>,
    ) -> FireoResult<Value> {
        let mut nested = Instance::new(model);
        for (name, value) in map {
            if model.field(&name).is_none() {
                return Err(FireoError::NestedModelType(format!(
                    "Invalid nested model type. Field \"{}\" requires model {}, which has no field \"{name}\"",
                    self.name, model.model_name
                )));
            }
            nested.set(&name, value).map_err(|err| match err {
                FireoError::ValidationError(inner) => FireoError::ValidationError(
                    ValidationError::with_field_errors(HashMap::from([(name.clone(), vec![inner])]))
                        .with_param("field", self.name),
                ),
                other => other,
            })?;
        }
        Ok(Value::Map(nested.assigned_values()))
    }

    fn nested_error(&self, model: &ModelMeta, got: &Value) -> FireoError {
        FireoError::NestedModelType(format!(
            "Invalid nested model type. Field \"{}\" requires value type {}, but got {}",
            self.name,
            model.model_name,
            got.type_name()
        ))
    }

    fn invalid(&self, message: String, code: &str) -> FireoError {
        FireoError::ValidationError(ValidationError::new(message, code).with_param("field", self.name))
    }

    fn tag(&self, err: FireoError) -> FireoError {
        match err {
            FireoError::ValidationError(e) => {
                FireoError::ValidationError(e.with_param("field", self.name))
            }
            other => other,
        }
    }
}
