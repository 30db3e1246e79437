//! Collection managers.
//!
//! A [`Collection`] binds a model type to a [`DocumentStore`] and provides the
//! create, save, get, fetch, update, and delete operations for its documents.
//! Every operation runs inside a `collection` tracing span.

use std::marker::PhantomData;

use tracing::{info, Instrument};

use crate::instance::Instance;
use crate::model::Model;
use crate::store::DocumentStore;
use crate::value::Value;
use fireo_core::logging::collection_span;
use fireo_core::utils::text::{document_key, is_valid_id, split_key};
use fireo_core::{FireoError, FireoResult, SETTINGS};

/// Fetch limit used when settings are not configured.
pub const DEFAULT_FETCH_LIMIT: usize = 100;

/// The document operations of one model on one store.
pub struct Collection<'a, M: Model> {
    store: &'a dyn DocumentStore,
    fetch_limit: usize,
    _model: PhantomData<fn() -> M>,
}

impl<'a, M: Model> Collection<'a, M> {
    /// Creates a manager whose fetch limit comes from the global settings.
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        let fetch_limit = SETTINGS
            .try_get()
            .map_or(DEFAULT_FETCH_LIMIT, |s| s.default_fetch_limit);
        Self {
            store,
            fetch_limit,
            _model: PhantomData,
        }
    }

    /// Overrides the number of documents [`fetch`](Self::fetch) returns by default.
    #[must_use]
    pub const fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit;
        self
    }

    /// Returns the collection name.
    pub fn name(&self) -> &'static str {
        M::collection_name()
    }

    /// Accepts either a full key in this collection or a bare id.
    fn resolve_id<'k>(&self, key_or_id: &'k str) -> FireoResult<&'k str> {
        if is_valid_id(key_or_id) {
            return Ok(key_or_id);
        }
        match split_key(key_or_id) {
            Some((collection, id)) if collection == self.name() => Ok(id),
            Some((collection, _)) => Err(FireoError::InvalidKey(format!(
                "\"{key_or_id}\" belongs to collection \"{collection}\", not \"{}\"",
                self.name()
            ))),
            None => Err(FireoError::InvalidKey(format!(
                "\"{key_or_id}\" is neither a document id nor a key"
            ))),
        }
    }

    fn ensure_model(&self, instance: &Instance) -> FireoResult<()> {
        if std::ptr::eq(instance.meta(), M::meta()) {
            Ok(())
        } else {
            Err(FireoError::ImproperlyConfigured(format!(
                "an instance of {} cannot be saved in collection \"{}\"",
                instance.meta().model_name,
                self.name()
            )))
        }
    }

    /// Builds an instance from `(attribute, value)` pairs and saves it.
    pub async fn create<I, K, V>(&self, values: I) -> FireoResult<Instance>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut instance = Instance::from_values(M::meta(), values)?;
        self.save(&mut instance).await?;
        Ok(instance)
    }

    /// Saves an instance with every field unset.
    pub async fn create_empty(&self) -> FireoResult<Instance> {
        let mut instance = M::new_instance();
        self.save(&mut instance).await?;
        Ok(instance)
    }

    /// Writes an instance, generating an id if it has none.
    ///
    /// Returns the document key. The instance only receives the generated id
    /// once the write succeeds.
    pub async fn save(&self, instance: &mut Instance) -> FireoResult<String> {
        self.ensure_model(instance)?;
        let name = self.name();
        async {
            let mut document = instance.to_document()?;
            let id = match document.id.clone() {
                Some(id) => id,
                None => self.store.generate_id(),
            };
            document.id = Some(id.clone());
            self.store.set(name, &document).await?;
            if instance.id().is_none() {
                instance.set_id(id.clone())?;
            }
            let key = document_key(name, &id);
            info!(key = %key, fields = document.len(), "saved document");
            Ok(key)
        }
        .instrument(collection_span(name, "save"))
        .await
    }

    /// Loads a document by key or id.
    pub async fn get(&self, key_or_id: &str) -> FireoResult<Instance> {
        let id = self.resolve_id(key_or_id)?;
        let name = self.name();
        async {
            let document = self
                .store
                .get(name, id)
                .await?
                .ok_or_else(|| FireoError::DoesNotExist(document_key(name, id)))?;
            Instance::from_document(M::meta(), document)
        }
        .instrument(collection_span(name, "get"))
        .await
    }

    /// Loads up to `limit` documents, or the configured fetch limit.
    pub async fn fetch(&self, limit: Option<usize>) -> FireoResult<Vec<Instance>> {
        let name = self.name();
        let limit = limit.unwrap_or(self.fetch_limit);
        async {
            let documents = self.store.list(name, Some(limit)).await?;
            tracing::debug!(count = documents.len(), limit, "fetched documents");
            documents
                .into_iter()
                .map(|document| Instance::from_document(M::meta(), document))
                .collect::<FireoResult<Vec<_>>>()
        }
        .instrument(collection_span(name, "fetch"))
        .await
    }

    /// Assigns `(attribute, value)` pairs to a stored document and saves it.
    ///
    /// Nothing is written if any assignment is rejected.
    pub async fn update<I, K, V>(&self, key_or_id: &str, values: I) -> FireoResult<Instance>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut instance = self.get(key_or_id).await?;
        for (name, value) in values {
            instance.set(name.as_ref(), value)?;
        }
        self.save(&mut instance).await?;
        Ok(instance)
    }

    /// Deletes a document by key or id.
    pub async fn delete(&self, key_or_id: &str) -> FireoResult<()> {
        let id = self.resolve_id(key_or_id)?;
        let name = self.name();
        async {
            if self.store.delete(name, id).await? {
                info!(key = %document_key(name, id), "deleted document");
                Ok(())
            } else {
                Err(FireoError::DoesNotExist(document_key(name, id)))
            }
        }
        .instrument(collection_span(name, "delete"))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldDef;
    use crate::model::ModelMeta;
    use crate::store::InMemoryStore;
    use std::sync::LazyLock;

    struct Company;

    impl Model for Company {
        fn meta() -> &'static ModelMeta {
            static META: LazyLock<ModelMeta> = LazyLock::new(|| {
                ModelMeta::new("Company", vec![FieldDef::text("name"), FieldDef::list("tags")])
            });
            &META
        }
    }

    struct Person;

    impl Model for Person {
        fn meta() -> &'static ModelMeta {
            static META: LazyLock<ModelMeta> =
                LazyLock::new(|| ModelMeta::new("Person", vec![FieldDef::text("name").required()]));
            &META
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryStore::new();
        let companies = Company::collection(&store);
        let created = companies.create([("name", "Acme")]).await.unwrap();
        let key = created.key().unwrap();
        assert!(key.starts_with("company/"));

        let by_key = companies.get(&key).await.unwrap();
        let by_id = companies.get(created.id().unwrap()).await.unwrap();
        assert_eq!(by_key, by_id);
        assert_eq!(by_key.get("name").unwrap(), Value::from("Acme"));
        assert_eq!(by_key.get("tags").unwrap(), Value::List(vec![]));
    }

    #[tokio::test]
    async fn test_save_keeps_explicit_id() {
        let store = InMemoryStore::new();
        let companies = Company::collection(&store);
        let mut company = Company::new_instance();
        company.set_id("acme").unwrap();
        assert_eq!(companies.save(&mut company).await.unwrap(), "company/acme");
        assert!(companies.get("acme").await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_id_unset() {
        let store = InMemoryStore::new();
        let people = Person::collection(&store);
        let mut person = Person::new_instance();
        let err = people.save(&mut person).await.unwrap_err();
        assert!(matches!(err, FireoError::RequiredField { .. }));
        assert!(person.id().is_none());
        assert_eq!(store.count("person").await, 0);
    }

    #[tokio::test]
    async fn test_save_rejects_foreign_instance() {
        let store = InMemoryStore::new();
        let mut person = Instance::from_values(Person::meta(), [("name", "Ann")]).unwrap();
        let err = Company::collection(&store).save(&mut person).await.unwrap_err();
        assert!(matches!(err, FireoError::ImproperlyConfigured(_)));
    }

    #[tokio::test]
    async fn test_get_errors() {
        let store = InMemoryStore::new();
        let companies = Company::collection(&store);
        assert!(matches!(
            companies.get("missing").await,
            Err(FireoError::DoesNotExist(ref key)) if key == "company/missing"
        ));
        assert!(matches!(
            companies.get("person/abc").await,
            Err(FireoError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_limit() {
        let store = InMemoryStore::new();
        let companies = Company::collection(&store).with_fetch_limit(2);
        for _ in 0..3 {
            companies.create_empty().await.unwrap();
        }
        assert_eq!(companies.fetch(None).await.unwrap().len(), 2);
        assert_eq!(companies.fetch(Some(10)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = InMemoryStore::new();
        let companies = Company::collection(&store);
        let created = companies.create([("name", "Acme")]).await.unwrap();
        let id = created.id().unwrap().to_string();

        let updated = companies.update(&id, [("tags", ["b2b"])]).await.unwrap();
        assert_eq!(updated.get("name").unwrap(), Value::from("Acme"));
        assert_eq!(
            companies.get(&id).await.unwrap().get("tags").unwrap(),
            Value::from(["b2b"])
        );

        assert!(companies.update(&id, [("tags", "b2b")]).await.is_err());
        assert_eq!(
            companies.get(&id).await.unwrap().get("tags").unwrap(),
            Value::from(["b2b"])
        );

        companies.delete(&id).await.unwrap();
        assert!(matches!(
            companies.delete(&id).await,
            Err(FireoError::DoesNotExist(_))
        ));
    }
}
