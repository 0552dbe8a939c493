//! Document store trait for pluggable database backends.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::filter::Filter;
use crate::types::patch::Patch;
use crate::types::query::FindQuery;

/// Capability set of a document-store client, per collection.
///
/// Documents are JSON objects carrying their identity under `_id`.
/// Implementations exist for an in-memory store and PostgreSQL JSONB
/// (both in `docrepo-database`). Read failures are reported as
/// `StoreRead` errors and write failures as `StoreWrite` errors.
///
/// Every call is a single request to the store; dropping the returned
/// future cancels it.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend name (e.g., "memory", "postgres").
    fn provider_type(&self) -> &str;

    /// Check whether the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Insert one document, generating `_id` when it is absent or null.
    /// Returns the document as stored.
    async fn insert_one(&self, collection: &str, doc: Value) -> AppResult<Value>;

    /// Fetch a document by identity.
    async fn find_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    /// Fetch the first document matching `filter` in natural order.
    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Value>>;

    /// Run a composed query.
    async fn find(&self, collection: &str, query: &FindQuery) -> AppResult<Vec<Value>>;

    /// Apply a patch to the document with this identity and return the
    /// updated document, or `None` if there is no such document.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: &Patch,
    ) -> AppResult<Option<Value>>;

    /// Delete the first document matching `filter`. Returns the number of
    /// documents removed (0 or 1).
    async fn delete_one(&self, collection: &str, filter: &Filter) -> AppResult<u64>;

    /// Count documents matching `filter`.
    async fn count(&self, collection: &str, filter: &Filter) -> AppResult<u64>;
}
