//! Model trait and metadata.
//!
//! The [`Model`] trait ties a Rust type to its static [`ModelMeta`]: the
//! model name, the collection its documents live in, and the ordered list of
//! field descriptors. Instances of a model are dynamic [`Instance`] values
//! bound to that metadata.

use std::collections::{HashMap, HashSet};

use crate::collection::Collection;
use crate::fields::{FieldDef, FieldType};
use crate::instance::Instance;
use crate::store::DocumentStore;
use fireo_core::checks::has_errors;
use fireo_core::utils::text::collection_name;
use fireo_core::{CheckMessage, FireoError, FireoResult};

/// The core trait for all models.
///
/// Implementors are usually unit structs that only carry metadata.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use fireo_db::fields::FieldDef;
/// use fireo_db::model::{Model, ModelMeta};
/// use fireo_db::value::Value;
///
/// struct User;
///
/// impl Model for User {
///     fn meta() -> &'static ModelMeta {
///         static META: LazyLock<ModelMeta> = LazyLock::new(|| {
///             ModelMeta::new("User", vec![FieldDef::list("subjects")])
///         });
///         &META
///     }
/// }
///
/// assert_eq!(User::collection_name(), "user");
/// let user = User::new_instance();
/// assert_eq!(user.get("subjects").unwrap(), Value::List(vec![]));
/// ```
pub trait Model: Send + Sync + 'static {
    /// Returns the static metadata for this model type.
    fn meta() -> &'static ModelMeta;

    /// Returns a fresh instance with every field unset.
    fn new_instance() -> Instance {
        Instance::new(Self::meta())
    }

    /// Returns the name of the collection this model is stored in.
    fn collection_name() -> &'static str {
        &Self::meta().collection_name
    }

    /// Returns the collection manager for this model on the given store.
    fn collection(store: &dyn DocumentStore) -> Collection<'_, Self>
    where
        Self: Sized,
    {
        Collection::new(store)
    }
}

/// Static metadata for a model type.
#[derive(Debug)]
pub struct ModelMeta {
    /// The model's type name (e.g., `"User"`).
    pub model_name: &'static str,
    /// The collection documents are stored in.
    pub collection_name: String,
    /// All fields, in declaration order.
    pub fields: Vec<FieldDef>,
}

impl ModelMeta {
    /// Creates metadata whose collection name is derived from `model_name`.
    pub fn new(model_name: &'static str, fields: Vec<FieldDef>) -> Self {
        Self {
            model_name,
            collection_name: collection_name(model_name),
            fields,
        }
    }

    /// Overrides the collection name.
    #[must_use]
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    /// Finds a field by attribute name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Finds a non-id field by the key it is stored under.
    pub fn field_by_storage_key(&self, key: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .find(|f| !f.field_type.is_id() && f.storage_key() == key)
    }

    /// Returns the id field, if the model declares one.
    pub fn id_field(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.field_type.is_id())
    }

    /// Checks the field declarations for consistency.
    ///
    /// Nested models are checked as part of their owner; their messages name
    /// the path through the owner (e.g. `Employee.address.street`).
    pub fn check(&self) -> Vec<CheckMessage> {
        let mut messages = Vec::new();
        let mut visiting = vec![std::ptr::from_ref(self)];
        self.check_at(self.model_name, &mut visiting, &mut messages);
        messages
    }

    fn check_at(
        &self,
        path: &str,
        visiting: &mut Vec<*const Self>,
        messages: &mut Vec<CheckMessage>,
    ) {
        let mut names: HashSet<&str> = HashSet::new();
        let mut storage_keys: HashMap<&str, &str> = HashMap::new();
        let mut id_fields = 0_usize;

        for field in &self.fields {
            let obj = format!("{path}.{}", field.name);

            if !names.insert(field.name) {
                messages.push(CheckMessage::error(
                    format!("Field \"{}\" is declared more than once.", field.name),
                    None,
                    Some(&obj),
                    Some("fields.E005"),
                ));
            }

            if field.field_type.is_id() {
                id_fields += 1;
            } else if let Some(previous) = storage_keys.insert(field.storage_key(), field.name) {
                messages.push(CheckMessage::error(
                    format!(
                        "Fields \"{previous}\" and \"{}\" are both stored under \"{}\".",
                        field.name,
                        field.storage_key()
                    ),
                    Some("Give one of them a different column_name."),
                    Some(&obj),
                    Some("fields.E001"),
                ));
            }

            if let Some(ref default) = field.default {
                if let Err(err) = field.clean(default.clone()) {
                    messages.push(CheckMessage::error(
                        format!("The default value is not valid for this field: {err}"),
                        None,
                        Some(&obj),
                        Some("fields.E003"),
                    ));
                }
                if field.required {
                    messages.push(CheckMessage::warning(
                        "A required field with a default never fails the required check.",
                        Some("Remove either required or the default."),
                        Some(&obj),
                        Some("fields.W001"),
                    ));
                }
            }

            if let FieldType::Nested { model } = field.field_type {
                let nested = model();
                if nested.id_field().is_some() {
                    messages.push(CheckMessage::error(
                        format!("Nested model {} declares an id field.", nested.model_name),
                        Some("Nested models are embedded and have no document id."),
                        Some(&obj),
                        Some("fields.E004"),
                    ));
                }
                let ptr = std::ptr::from_ref(nested);
                if !visiting.contains(&ptr) {
                    visiting.push(ptr);
                    nested.check_at(&obj, visiting, messages);
                    visiting.pop();
                }
            }
        }

        if id_fields > 1 {
            messages.push(CheckMessage::error(
                format!("Model {} declares {id_fields} id fields.", self.model_name),
                None,
                Some(path),
                Some("fields.E002"),
            ));
        }
    }

    /// Fails with [`FireoError::ImproperlyConfigured`] if [`check`](Self::check)
    /// reports any error.
    pub fn ensure_valid(&self) -> FireoResult<()> {
        let messages = self.check();
        if !has_errors(&messages) {
            return Ok(());
        }
        let details: Vec<String> = messages
            .iter()
            .filter(|m| m.is_error())
            .map(ToString::to_string)
            .collect();
        Err(FireoError::ImproperlyConfigured(format!(
            "model {} is invalid: {}",
            self.model_name,
            details.join("; ")
        )))
    }
}
