//! Generic base repository.
//!
//! [`BaseRepository`] is meant to be wrapped (or used directly) per entity
//! type. It translates entity-level calls into collection-level store
//! calls and decodes the results. It keeps no state besides the store
//! handle and the collection name, so one instance can serve concurrent
//! callers.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use docrepo_core::config::RepositoryConfig;
use docrepo_core::error::AppError;
use docrepo_core::result::AppResult;
use docrepo_core::traits::{Document, DocumentStore, Repository};
use docrepo_core::types::{Filter, FindQuery, ID_FIELD, ListQuery, Page, Patch};

use crate::pagination::{paginate, skip_for};

/// CRUD and paginated listing for entity `T` over store `S`.
pub struct BaseRepository<T, S: ?Sized = dyn DocumentStore> {
    store: Arc<S>,
    collection: String,
    default_page_size: u64,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S: ?Sized> Clone for BaseRepository<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
            default_page_size: self.default_page_size,
            _entity: PhantomData,
        }
    }
}

impl<T, S: ?Sized> std::fmt::Debug for BaseRepository<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseRepository")
            .field("collection", &self.collection)
            .field("default_page_size", &self.default_page_size)
            .finish()
    }
}

impl<T, S> BaseRepository<T, S>
where
    T: Document,
    S: DocumentStore + ?Sized,
{
    /// Create a repository over the entity's default collection.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_collection(store, T::COLLECTION)
    }

    /// Create a repository over a named collection.
    pub fn with_collection(store: Arc<S>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
            default_page_size: RepositoryConfig::default().default_page_size,
            _entity: PhantomData,
        }
    }

    /// Apply repository defaults from configuration.
    pub fn with_config(mut self, config: &RepositoryConfig) -> Self {
        self.default_page_size = config.default_page_size;
        self
    }

    /// The collection this repository reads and writes.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Insert an entity and return it as stored, identity included.
    ///
    /// Fails with `Internal` when the decoded entity does not expose the
    /// identity the store assigned, which means `T` drops `_id` on
    /// deserialization. The document is stored regardless.
    pub async fn create(&self, item: &T) -> AppResult<T> {
        let doc = serde_json::to_value(item)?;
        let stored = self.store.insert_one(&self.collection, doc).await?;
        let created: T = decode(stored)?;
        let Some(id) = created.id() else {
            return Err(AppError::internal(format!(
                "{} entity in '{}' does not carry its {ID_FIELD}",
                std::any::type_name::<T>(),
                self.collection
            )));
        };
        debug!(collection = %self.collection, id, "Created document");
        Ok(created)
    }

    /// Apply a partial update and return the updated entity.
    pub async fn update(&self, id: &str, patch: Patch) -> AppResult<Option<T>> {
        let updated = self
            .store
            .update_by_id(&self.collection, id, &patch)
            .await?;
        debug!(collection = %self.collection, id, found = updated.is_some(), "Updated document");
        updated.map(decode).transpose()
    }

    /// Delete by identity. `true` only if a document was actually removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let removed = self
            .store
            .delete_one(&self.collection, &Filter::by_id(id))
            .await?;
        debug!(collection = %self.collection, id, removed, "Deleted document");
        Ok(removed > 0)
    }

    /// Fetch by identity.
    pub async fn get(&self, id: &str) -> AppResult<Option<T>> {
        let found = self.store.find_by_id(&self.collection, id).await?;
        debug!(collection = %self.collection, id, found = found.is_some(), "Fetched document");
        found.map(decode).transpose()
    }

    /// Fetch the first entity matching `filter`.
    pub async fn find_one(&self, filter: &Filter) -> AppResult<Option<T>> {
        let found = self.store.find_one(&self.collection, filter).await?;
        debug!(collection = %self.collection, found = found.is_some(), "Found one document");
        found.map(decode).transpose()
    }

    /// Fetch every entity matching `filter`, in natural order.
    pub async fn find(&self, filter: &Filter) -> AppResult<Vec<T>> {
        let docs = self
            .store
            .find(&self.collection, &FindQuery::new(filter.clone()))
            .await?;
        debug!(collection = %self.collection, count = docs.len(), "Found documents");
        docs.into_iter().map(decode).collect()
    }

    /// Paginated listing, decoded into `T`.
    ///
    /// With a projection, `T` must accept the missing fields; use
    /// [`get_all_documents`](Self::get_all_documents) otherwise.
    pub async fn get_all(&self, query: ListQuery) -> AppResult<Page<T>> {
        let page = self.get_all_documents(query).await?;
        let records = page
            .records
            .into_iter()
            .map(decode)
            .collect::<AppResult<Vec<T>>>()?;
        Ok(Page {
            records,
            pagination: page.pagination,
        })
    }

    /// Paginated listing of raw documents.
    ///
    /// `page == 0` returns every match with no pagination metadata.
    /// Otherwise the match count is taken with the same filter, then the
    /// listing is windowed to `page_size` records starting at
    /// `(page - 1) * page_size`.
    pub async fn get_all_documents(&self, query: ListQuery) -> AppResult<Page<Value>> {
        let ListQuery {
            page,
            page_size,
            search,
            sort,
            select,
        } = query;
        let page_size = page_size.unwrap_or(self.default_page_size);
        if page > 0 && page_size == 0 {
            return Err(AppError::validation("page_size must be at least 1"));
        }

        let mut find = FindQuery::new(search).sort(sort);
        if let Some(projection) = select {
            find = find.select(projection);
        }

        let mut pagination = None;
        if page > 0 {
            let total = self.store.count(&self.collection, &find.filter).await?;
            pagination = Some(paginate(page, page_size, total));
            find = find.skip(skip_for(page, page_size)).limit(page_size);
        }

        let records = self.store.find(&self.collection, &find).await?;
        debug!(
            collection = %self.collection,
            page,
            page_size,
            total = pagination.map(|p| p.total),
            returned = records.len(),
            "Listed documents"
        );
        Ok(Page {
            records,
            pagination,
        })
    }
}

#[async_trait]
impl<T, S> Repository<T> for BaseRepository<T, S>
where
    T: Document,
    S: DocumentStore + ?Sized,
{
    async fn create(&self, item: &T) -> AppResult<T> {
        BaseRepository::create(self, item).await
    }

    async fn update(&self, id: &str, patch: Patch) -> AppResult<Option<T>> {
        BaseRepository::update(self, id, patch).await
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        BaseRepository::delete(self, id).await
    }

    async fn get(&self, id: &str) -> AppResult<Option<T>> {
        BaseRepository::get(self, id).await
    }

    async fn find_one(&self, filter: &Filter) -> AppResult<Option<T>> {
        BaseRepository::find_one(self, filter).await
    }

    async fn find(&self, filter: &Filter) -> AppResult<Vec<T>> {
        BaseRepository::find(self, filter).await
    }

    async fn get_all(&self, query: ListQuery) -> AppResult<Page<T>> {
        BaseRepository::get_all(self, query).await
    }
}

fn decode<T: Document>(doc: Value) -> AppResult<T> {
    Ok(serde_json::from_value(doc)?)
}
