//! Shared test helpers for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use docrepo_core::error::AppError;
use docrepo_core::result::AppResult;
use docrepo_core::traits::{Document, DocumentStore};
use docrepo_core::types::{Filter, FindQuery, Patch};
use docrepo_database::{BaseRepository, MemoryStore};

/// Cities assigned round-robin by [`seed_people`].
pub const CITIES: [&str; 3] = ["Oslo", "Bergen", "Tromsø"];

/// Test entity stored in the `people` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub age: i64,
    pub city: String,
}

impl Person {
    /// A person without an identity, so the store assigns one.
    pub fn new(name: &str, age: i64, city: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            age,
            city: city.to_string(),
        }
    }

    /// A person with a fixed identity.
    pub fn with_id(id: &str, name: &str, age: i64, city: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::new(name, age, city)
        }
    }
}

impl Document for Person {
    const COLLECTION: &'static str = "people";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Test repository context
pub struct TestRepo {
    /// The repository under test
    pub repo: BaseRepository<Person>,
    /// Direct handle to the backing store
    pub store: Arc<MemoryStore>,
}

impl TestRepo {
    /// Create a repository over a fresh in-memory store
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let repo = BaseRepository::<Person>::new(store.clone() as Arc<dyn DocumentStore>);
        Self { repo, store }
    }

    /// Create a repository pre-populated by [`seed_people`]
    pub async fn seeded(count: usize) -> Self {
        let app = Self::new();
        seed_people(&app.repo, count).await;
        app
    }
}

/// Insert `count` people with ids `p01`, `p02`, ... and ages 20, 21, ...
pub async fn seed_people(repo: &BaseRepository<Person>, count: usize) -> Vec<Person> {
    let mut created = Vec::with_capacity(count);
    for i in 0..count {
        let person = Person::with_id(
            &format!("p{:02}", i + 1),
            &format!("Person {}", i + 1),
            20 + i as i64,
            CITIES[i % CITIES.len()],
        );
        created.push(repo.create(&person).await.expect("Failed to seed person"));
    }
    created
}

/// Identities of a list of people, in order.
pub fn ids(people: &[Person]) -> Vec<String> {
    people.iter().filter_map(|p| p.id.clone()).collect()
}

/// Store whose every call fails, reads with `StoreRead` and writes with
/// `StoreWrite`.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    fn provider_type(&self) -> &str {
        "failing"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Err(AppError::store_read("connection refused"))
    }

    async fn insert_one(&self, _collection: &str, _doc: Value) -> AppResult<Value> {
        Err(AppError::store_write("insert rejected"))
    }

    async fn find_by_id(&self, _collection: &str, _id: &str) -> AppResult<Option<Value>> {
        Err(AppError::store_read("read timed out"))
    }

    async fn find_one(&self, _collection: &str, _filter: &Filter) -> AppResult<Option<Value>> {
        Err(AppError::store_read("read timed out"))
    }

    async fn find(&self, _collection: &str, _query: &FindQuery) -> AppResult<Vec<Value>> {
        Err(AppError::store_read("read timed out"))
    }

    async fn update_by_id(
        &self,
        _collection: &str,
        _id: &str,
        _patch: &Patch,
    ) -> AppResult<Option<Value>> {
        Err(AppError::store_write("update rejected"))
    }

    async fn delete_one(&self, _collection: &str, _filter: &Filter) -> AppResult<u64> {
        Err(AppError::store_write("delete rejected"))
    }

    async fn count(&self, _collection: &str, _filter: &Filter) -> AppResult<u64> {
        Err(AppError::store_read("count timed out"))
    }
}
