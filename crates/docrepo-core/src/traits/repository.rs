//! Generic repository trait for document access.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::traits::document::Document;
use crate::types::filter::Filter;
use crate::types::pagination::{ListQuery, Page};
use crate::types::patch::Patch;

/// Generic CRUD + listing repository for one entity type.
///
/// "Not found" is never an error: lookups return `None`, `delete`
/// returns `false`. Store failures are returned unchanged.
#[async_trait]
pub trait Repository<T>: Send + Sync + 'static
where
    T: Document,
{
    /// Insert an entity and return it as stored, identity included.
    async fn create(&self, item: &T) -> AppResult<T>;

    /// Apply a partial update. Returns `None` if no entity has this identity.
    async fn update(&self, id: &str, patch: Patch) -> AppResult<Option<T>>;

    /// Delete by identity. Returns `true` only if an entity was removed.
    async fn delete(&self, id: &str) -> AppResult<bool>;

    /// Fetch by identity.
    async fn get(&self, id: &str) -> AppResult<Option<T>>;

    /// Fetch the first entity matching `filter`.
    async fn find_one(&self, filter: &Filter) -> AppResult<Option<T>>;

    /// Fetch every entity matching `filter`; empty when nothing matches.
    async fn find(&self, filter: &Filter) -> AppResult<Vec<T>>;

    /// Paginated listing.
    async fn get_all(&self, query: ListQuery) -> AppResult<Page<T>>;
}
