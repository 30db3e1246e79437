//! Document store trait and the in-memory store.
//!
//! This module defines the [`DocumentStore`] trait that provides the minimal
//! async interface the ORM layer needs to persist documents. Collection
//! managers accept `&dyn DocumentStore`, so models never depend on a
//! concrete backend.

use std::collections::HashMap;

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::document::Document;
use crate::value::Value;
use fireo_core::utils::text::is_valid_id;
use fireo_core::{FireoError, FireoResult};

/// Length of generated document ids.
pub const GENERATED_ID_LEN: usize = 20;

/// Minimal async document store.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes a document, replacing any existing document with the same id.
    ///
    /// The document must carry an id.
    async fn set(&self, collection: &str, document: &Document) -> FireoResult<()>;

    /// Reads a document by id.
    async fn get(&self, collection: &str, id: &str) -> FireoResult<Option<Document>>;

    /// Deletes a document by id, returning whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> FireoResult<bool>;

    /// Lists up to `limit` documents of a collection.
    async fn list(&self, collection: &str, limit: Option<usize>) -> FireoResult<Vec<Document>>;

    /// Generates an id for a new document.
    fn generate_id(&self) -> String {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(GENERATED_ID_LEN);
        id
    }
}

type Collections = HashMap<String, IndexMap<String, IndexMap<String, Value>>>;

/// A document store held in process memory.
///
/// Collections keep documents in first-write order; overwriting a document
/// keeps its position.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<Collections>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, IndexMap::len)
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryStore {
    async fn set(&self, collection: &str, document: &Document) -> FireoResult<()> {
        let id = document
            .id
            .as_deref()
            .ok_or_else(|| FireoError::InvalidKey("document has no id".to_string()))?;
        if !is_valid_id(id) {
            return Err(FireoError::InvalidKey(format!(
                "\"{id}\" is not a valid document id"
            )));
        }
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document.fields.clone());
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> FireoResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                id: Some(id.to_string()),
                fields: fields.clone(),
            }))
    }

    async fn delete(&self, collection: &str, id: &str) -> FireoResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .and_then(|docs| docs.shift_remove(id))
            .is_some())
    }

    async fn list(&self, collection: &str, limit: Option<usize>) -> FireoResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(id, fields)| Document {
                id: Some(id.clone()),
                fields: fields.clone(),
            })
            .collect())
    }
}
