//! In-memory document store using the dashmap crate.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use docrepo_core::error::AppError;
use docrepo_core::result::AppResult;
use docrepo_core::traits::DocumentStore;
use docrepo_core::types::{Filter, FindQuery, ID_FIELD, Patch};

use super::evaluator;
use crate::identity::{assign_identity, document_id};

/// In-memory document store.
///
/// Each collection is a vector in insertion order (the natural order).
/// Every call holds the lock of a single collection entry for its whole
/// duration, so each call is atomic with respect to the others.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<DashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collections that have received at least one insert.
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn insert_one(&self, collection: &str, doc: Value) -> AppResult<Value> {
        let (id, doc) = assign_identity(doc)?;
        let doc = Value::Object(doc);
        let mut entry = self.collections.entry(collection.to_string()).or_default();

        if entry
            .iter()
            .any(|existing| document_id(existing) == Some(id.as_str()))
        {
            return Err(AppError::store_write(format!(
                "duplicate key: {collection} already contains {ID_FIELD} '{id}'"
            )));
        }

        debug!(collection, id = %id, "Inserted document");
        entry.push(doc.clone());
        Ok(doc)
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        Ok(self.collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|doc| document_id(doc) == Some(id))
                .cloned()
        }))
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Value>> {
        Ok(self.collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|doc| evaluator::matches(doc, filter))
                .cloned()
        }))
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> AppResult<Vec<Value>> {
        let Some(docs) = self.collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<&Value> = docs
            .iter()
            .filter(|doc| evaluator::matches(doc, &query.filter))
            .collect();
        if !query.sort.is_natural() {
            matched.sort_by(|a, b| evaluator::compare_by(a, b, &query.sort));
        }

        let skip = usize::try_from(query.skip.unwrap_or(0)).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|doc| match &query.projection {
                Some(projection) => projection.apply(doc),
                None => doc.clone(),
            })
            .collect())
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: &Patch,
    ) -> AppResult<Option<Value>> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some(doc) = docs.iter_mut().find(|doc| document_id(doc) == Some(id)) else {
            return Ok(None);
        };
        if let Value::Object(map) = doc {
            patch.apply_to(map);
        }
        Ok(Some(doc.clone()))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> AppResult<u64> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(0);
        };
        match docs.iter().position(|doc| evaluator::matches(doc, filter)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count(&self, collection: &str, filter: &Filter) -> AppResult<u64> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| evaluator::matches(doc, filter))
                    .count() as u64
            })
            .unwrap_or(0))
    }
}
