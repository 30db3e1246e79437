//! Model instances.
//!
//! An [`Instance`] holds the per-object state of a model: the document id and
//! one slot per assigned field. Reads go through the field descriptors, so an
//! unset slot yields the field's default or its empty value. Writes are type
//! checked and validated immediately; a rejected value leaves the slot as it
//! was.

use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::document::Document;
use crate::fields::FieldDef;
use crate::model::ModelMeta;
use crate::value::Value;
use fireo_core::utils::text::{document_key, is_valid_id};
use fireo_core::{FireoError, FireoResult};

/// A dynamic instance of a model.
#[derive(Clone)]
pub struct Instance {
    meta: &'static ModelMeta,
    id: Option<String>,
    values: IndexMap<&'static str, Value>,
}

impl Instance {
    /// Creates an instance with every field unset.
    pub fn new(meta: &'static ModelMeta) -> Self {
        Self {
            meta,
            id: None,
            values: IndexMap::new(),
        }
    }

    /// Creates an instance and assigns each `(attribute, value)` pair in order.
    ///
    /// Fails on the first unknown attribute or rejected value.
    pub fn from_values<I, K, V>(meta: &'static ModelMeta, values: I) -> FireoResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut instance = Self::new(meta);
        for (name, value) in values {
            instance.set(name.as_ref(), value)?;
        }
        Ok(instance)
    }

    /// Rebuilds an instance from a stored document.
    pub fn from_document(meta: &'static ModelMeta, document: Document) -> FireoResult<Self> {
        Self::from_storage_fields(meta, document.id, document.fields)
    }

    /// Rebuilds an instance from fields keyed by storage key.
    ///
    /// Keys that no field is stored under are skipped. Stored values are
    /// trusted and not re-validated.
    pub fn from_storage_fields(
        meta: &'static ModelMeta,
        id: Option<String>,
        fields: IndexMap<String, Value>,
    ) -> FireoResult<Self> {
        let mut instance = Self::new(meta);
        instance.id = id;
        for (key, stored) in fields {
            let Some(field) = meta.field_by_storage_key(&key) else {
                trace!(model = meta.model_name, key = %key, "skipping unknown stored key");
                continue;
            };
            if let Some(value) = field.load(stored)? {
                instance.values.insert(field.name, value);
            }
        }
        Ok(instance)
    }

    /// Returns the model metadata.
    pub const fn meta(&self) -> &'static ModelMeta {
        self.meta
    }

    /// Returns the document id, if assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Assigns the document id.
    pub fn set_id(&mut self, id: impl Into<String>) -> FireoResult<()> {
        let id = id.into();
        if !is_valid_id(&id) {
            return Err(FireoError::InvalidKey(format!(
                "\"{id}\" is not a valid document id"
            )));
        }
        self.id = Some(id);
        Ok(())
    }

    /// Returns `"<collection>/<id>"` once an id is assigned.
    pub fn key(&self) -> Option<String> {
        self.id
            .as_deref()
            .map(|id| document_key(&self.meta.collection_name, id))
    }

    fn field(&self, name: &str) -> FireoResult<&'static FieldDef> {
        self.meta
            .field(name)
            .ok_or_else(|| FireoError::UnknownField {
                model: self.meta.model_name.to_string(),
                field: name.to_string(),
            })
    }

    fn read(&self, field: &FieldDef) -> Value {
        if field.field_type.is_id() {
            return self.id.clone().map_or(Value::Null, Value::String);
        }
        field.read(self.values.get(field.name))
    }

    /// Reads a field: the assigned value, else the default, else the field's
    /// empty value.
    pub fn get(&self, name: &str) -> FireoResult<Value> {
        let field = self.field(name)?;
        Ok(self.read(field))
    }

    /// Assigns a field after type checking and validating the value.
    ///
    /// Assigning `Null` unsets the field. Assigning the id field sets the
    /// document id.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> FireoResult<()> {
        let field = self.field(name)?;
        let value = value.into();
        if value.is_null() {
            return self.unset(name);
        }
        let cleaned = field.clean(value).map_err(|err| {
            debug!(model = self.meta.model_name, field = field.name, error = %err, "rejected assignment");
            err
        })?;
        if field.field_type.is_id() {
            if let Value::String(id) = cleaned {
                self.id = Some(id);
            }
        } else {
            self.values.insert(field.name, cleaned);
        }
        Ok(())
    }

    /// Clears a field so that reads fall back to its default.
    pub fn unset(&mut self, name: &str) -> FireoResult<()> {
        let field = self.field(name)?;
        if field.field_type.is_id() {
            self.id = None;
        } else {
            self.values.shift_remove(field.name);
        }
        Ok(())
    }

    /// Returns `true` if the field has an assigned value.
    pub fn is_set(&self, name: &str) -> FireoResult<bool> {
        let field = self.field(name)?;
        Ok(if field.field_type.is_id() {
            self.id.is_some()
        } else {
            self.values.contains_key(field.name)
        })
    }

    /// Reads every field, keyed by attribute name, in declaration order.
    pub fn values(&self) -> IndexMap<String, Value> {
        self.meta
            .fields
            .iter()
            .map(|f| (f.name.to_string(), self.read(f)))
            .collect()
    }

    /// Returns only the assigned slots, keyed by attribute name.
    pub fn assigned_values(&self) -> IndexMap<String, Value> {
        self.values
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone()))
            .collect()
    }

    /// Resolves every non-id field to its stored value, keyed by storage key.
    ///
    /// Fails with [`FireoError::RequiredField`] for the first required field
    /// that has neither a value nor a default.
    pub fn storage_fields(&self) -> FireoResult<IndexMap<String, Value>> {
        let mut fields = IndexMap::with_capacity(self.meta.fields.len());
        for field in self.meta.fields.iter().filter(|f| !f.field_type.is_id()) {
            let value = field.persist(self.meta, self.values.get(field.name))?;
            fields.insert(field.storage_key().to_string(), value);
        }
        Ok(fields)
    }

    /// Builds the document to write for this instance.
    ///
    /// Refuses models whose declarations fail [`ModelMeta::check`].
    pub fn to_document(&self) -> FireoResult<Document> {
        self.meta.ensure_valid()?;
        Ok(Document {
            id: self.id.clone(),
            fields: self.storage_fields()?,
        })
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.meta, other.meta) && self.id == other.id && self.values == other.values
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("model", &self.meta.model_name)
            .field("id", &self.id)
            .field("values", &self.values)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    fn user_meta() -> &'static ModelMeta {
        static META: LazyLock<ModelMeta> = LazyLock::new(|| {
            ModelMeta::new(
                "User",
                vec![
                    FieldDef::id("user_id"),
                    FieldDef::text("name"),
                    FieldDef::list("subjects")
                        .column_name("subs")
                        .validator(|v| v.as_list().is_some_and(|l| l.len() <= 3)),
                    FieldDef::list("hobbies").default(["Chess"]),
                ],
            )
        });
        &META
    }

    fn strict_meta() -> &'static ModelMeta {
        static META: LazyLock<ModelMeta> = LazyLock::new(|| {
            ModelMeta::new("Strict", vec![FieldDef::list("subjects").required()])
        });
        &META
    }

    fn broken_meta() -> &'static ModelMeta {
        static META: LazyLock<ModelMeta> = LazyLock::new(|| {
            ModelMeta::new(
                "Broken",
                vec![FieldDef::list("a").column_name("x"), FieldDef::list("b").column_name("x")],
            )
        });
        &META
    }

    #[test]
    fn test_unset_list_reads_empty() {
        let user = Instance::new(user_meta());
        assert_eq!(user.get("subjects").unwrap(), Value::List(vec![]));
        assert_eq!(user.get("name").unwrap(), Value::Null);
        assert_eq!(user.get("hobbies").unwrap(), Value::from(["Chess"]));
        assert!(!user.is_set("subjects").unwrap());
    }

    #[test]
    fn test_set_then_get() {
        let mut user = Instance::new(user_meta());
        user.set("subjects", ["English", "Math"]).unwrap();
        assert_eq!(user.get("subjects").unwrap(), Value::from(["English", "Math"]));
        assert!(user.is_set("subjects").unwrap());
    }

    #[test]
    fn test_rejected_value_keeps_prior() {
        let mut user = Instance::new(user_meta());
        user.set("subjects", ["Math"]).unwrap();
        let err = user.set("subjects", ["a", "b", "c", "d"]).unwrap_err();
        assert!(err.is_value_error());
        assert_eq!(user.get("subjects").unwrap(), Value::from(["Math"]));

        let err = user.set("subjects", "Math").unwrap_err();
        assert!(err.is_value_error());
        assert_eq!(user.get("subjects").unwrap(), Value::from(["Math"]));
    }

    #[test]
    fn test_set_null_unsets() {
        let mut user = Instance::new(user_meta());
        user.set("hobbies", ["Go"]).unwrap();
        user.set("hobbies", Value::Null).unwrap();
        assert_eq!(user.get("hobbies").unwrap(), Value::from(["Chess"]));
    }

    #[test]
    fn test_unknown_field() {
        let mut user = Instance::new(user_meta());
        assert!(matches!(
            user.set("subs", ["Math"]),
            Err(FireoError::UnknownField { ref field, .. }) if field == "subs"
        ));
        assert!(user.get("missing").is_err());
    }

    #[test]
    fn test_id_field_sets_id() {
        let mut user = Instance::new(user_meta());
        user.set("user_id", "alice").unwrap();
        assert_eq!(user.id(), Some("alice"));
        assert_eq!(user.key().as_deref(), Some("user/alice"));
        assert_eq!(user.get("user_id").unwrap(), Value::from("alice"));
        assert!(user.set_id("a/b").is_err());
        user.unset("user_id").unwrap();
        assert!(user.id().is_none());
    }

    #[test]
    fn test_storage_fields_use_column_name() {
        let user = Instance::from_values(user_meta(), [("subjects", ["Math"])]).unwrap();
        let fields = user.storage_fields().unwrap();
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "subs", "hobbies"]);
        assert_eq!(fields["subs"], Value::from(["Math"]));
        assert_eq!(fields["name"], Value::Null);
        assert_eq!(fields["hobbies"], Value::from(["Chess"]));
    }

    #[test]
    fn test_required_field_fails_at_document() {
        let strict = Instance::new(strict_meta());
        assert!(matches!(
            strict.to_document(),
            Err(FireoError::RequiredField { ref field, .. }) if field == "subjects"
        ));
        let strict = Instance::from_values(strict_meta(), [("subjects", Vec::<Value>::new())]).unwrap();
        assert!(strict.to_document().is_ok());
    }

    #[test]
    fn test_invalid_model_refuses_document() {
        let broken = Instance::new(broken_meta());
        assert!(matches!(
            broken.to_document(),
            Err(FireoError::ImproperlyConfigured(_))
        ));
    }

    #[test]
    fn test_from_document_round_trip() {
        let mut user = Instance::from_values(
            user_meta(),
            [("name", Value::from("Ann")), ("subjects", Value::from(["Art"]))],
        )
        .unwrap();
        user.set_id("ann").unwrap();
        let mut doc = user.to_document().unwrap();
        doc.insert("legacy", Value::Int(1));

        let loaded = Instance::from_document(user_meta(), doc).unwrap();
        assert_eq!(loaded.id(), Some("ann"));
        assert_eq!(loaded.get("subjects").unwrap(), Value::from(["Art"]));
        assert_eq!(loaded.get("name").unwrap(), Value::from("Ann"));
        assert_eq!(loaded.get("hobbies").unwrap(), Value::from(["Chess"]));
    }

    #[test]
    fn test_values_in_declaration_order() {
        let user = Instance::new(user_meta());
        let values = user.values();
        let keys: Vec<&str> = values.keys().map(String::as_str).collect();
        assert_eq!(keys, ["user_id", "name", "subjects", "hobbies"]);
    }
}
