//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use docrepo_core::config::{StoreConfig, StoreProvider};
use docrepo_core::error::AppError;
use docrepo_core::result::AppResult;
use docrepo_core::traits::DocumentStore;
use docrepo_core::types::{Filter, FindQuery, Patch};

/// Store manager wrapping the configured document store.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    inner: Arc<dyn DocumentStore>,
}

impl StoreManager {
    /// Connect the backend named by `config`. The PostgreSQL backend runs
    /// pending migrations before it is handed out.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn DocumentStore> = match config.provider {
            #[cfg(feature = "memory")]
            StoreProvider::Memory => {
                info!("Initializing in-memory document store");
                Arc::new(crate::memory::MemoryStore::new())
            }
            #[cfg(feature = "postgres")]
            StoreProvider::Postgres => {
                info!("Initializing PostgreSQL document store");
                let db = crate::postgres::DatabasePool::connect(config).await?;
                crate::postgres::run_migrations(db.pool()).await?;
                Arc::new(crate::postgres::PgDocumentStore::new(db))
            }
            #[allow(unreachable_patterns)]
            other => {
                return Err(AppError::configuration(format!(
                    "Document store provider '{other}' is not compiled in"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Shared handle to the inner store, as taken by repositories.
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl DocumentStore for StoreManager {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn insert_one(&self, collection: &str, doc: Value) -> AppResult<Value> {
        self.inner.insert_one(collection, doc).await
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        self.inner.find_by_id(collection, id).await
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> AppResult<Option<Value>> {
        self.inner.find_one(collection, filter).await
    }

    async fn find(&self, collection: &str, query: &FindQuery) -> AppResult<Vec<Value>> {
        self.inner.find(collection, query).await
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: &Patch,
    ) -> AppResult<Option<Value>> {
        self.inner.update_by_id(collection, id, patch).await
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> AppResult<u64> {
        self.inner.delete_one(collection, filter).await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> AppResult<u64> {
        self.inner.count(collection, filter).await
    }
}
