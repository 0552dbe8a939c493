//! Integration tests against a live PostgreSQL server.
//!
//! Ignored by default. Run with
//! `DOCREPO_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.

use std::sync::Arc;

use serde_json::json;

use docrepo_core::config::{StoreConfig, StoreProvider};
use docrepo_core::error::ErrorKind;
use docrepo_core::traits::DocumentStore;
use docrepo_core::types::{
    DocumentId, Filter, FilterField, ListQuery, Pagination, Patch, Sort, SortField,
};
use docrepo_database::{BaseRepository, StoreManager};

use crate::helpers::{Person, ids, seed_people};

/// Connect to the test database and return a repository over a
/// collection no other test uses.
async fn pg_repo() -> BaseRepository<Person> {
    let url = std::env::var("DOCREPO_TEST_DATABASE_URL")
        .expect("DOCREPO_TEST_DATABASE_URL must be set for PostgreSQL tests");
    let config = StoreConfig {
        provider: StoreProvider::Postgres,
        url,
        ..StoreConfig::default()
    };
    let manager = StoreManager::new(&config)
        .await
        .expect("Failed to connect to test database");
    let collection = format!("people_{}", DocumentId::generate());
    BaseRepository::with_collection(manager.store(), collection)
}

#[tokio::test]
#[ignore = "requires DOCREPO_TEST_DATABASE_URL"]
async fn test_pg_paging() {
    let repo = pg_repo().await;
    seed_people(&repo, 25).await;

    let first = repo.get_all(ListQuery::page(1).page_size(10)).await.unwrap();
    assert_eq!(first.records.len(), 10);
    assert_eq!(ids(&first.records)[0], "p25");
    assert_eq!(
        first.pagination,
        Some(Pagination {
            page: 1,
            page_size: 10,
            total: 25,
            total_pages: 3
        })
    );

    let third = repo.get_all(ListQuery::page(3).page_size(10)).await.unwrap();
    assert_eq!(third.records.len(), 5);

    let fourth = repo.get_all(ListQuery::page(4).page_size(10)).await.unwrap();
    assert!(fourth.records.is_empty());

    let all = repo.get_all(ListQuery::unpaginated()).await.unwrap();
    assert_eq!(all.records.len(), 25);
    assert_eq!(all.pagination, None);
}

#[tokio::test]
#[ignore = "requires DOCREPO_TEST_DATABASE_URL"]
async fn test_pg_filters_sort_and_projection() {
    let repo = pg_repo().await;
    seed_people(&repo, 9).await;

    let search = Filter::from_json(&json!({
        "age": {"$gte": 22},
        "city": {"$in": ["Oslo", "Bergen"]},
        "name": {"$ilike": "person%"}
    }))
    .unwrap();
    let page = repo
        .get_all_documents(
            ListQuery::page(1)
                .search(search)
                .sort(Sort::by(SortField::asc("age")))
                .select_fields("age"),
        )
        .await
        .unwrap();

    assert_eq!(
        page.records,
        vec![
            json!({"_id": "p04", "age": 23}),
            json!({"_id": "p05", "age": 24}),
            json!({"_id": "p07", "age": 26}),
            json!({"_id": "p08", "age": 27}),
        ]
    );
    assert_eq!(page.pagination.map(|p| p.total), Some(4));
}

#[tokio::test]
#[ignore = "requires DOCREPO_TEST_DATABASE_URL"]
async fn test_pg_crud() {
    let repo = pg_repo().await;

    let created = repo.create(&Person::new("Kari", 31, "Oslo")).await.unwrap();
    let id = created.id.clone().unwrap();
    assert_eq!(repo.get(&id).await.unwrap(), Some(created.clone()));

    let err = repo.create(&created).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StoreWrite);

    let updated = repo
        .update(&id, Patch::new().set("age", 32))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.age, 32);
    assert_eq!(repo.update("missing", Patch::new().set("age", 1)).await.unwrap(), None);

    let found = repo
        .find_one(&Filter::from(FilterField::eq("name", "Kari")))
        .await
        .unwrap();
    assert_eq!(found, Some(updated));

    assert!(repo.delete(&id).await.unwrap());
    assert!(!repo.delete(&id).await.unwrap());
    assert!(repo.find(&Filter::all()).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires DOCREPO_TEST_DATABASE_URL"]
async fn test_pg_health() {
    let repo = pg_repo().await;
    let store: &Arc<dyn DocumentStore> = repo.store();
    assert_eq!(store.provider_type(), "postgres");
    assert!(store.health_check().await.unwrap());
}
