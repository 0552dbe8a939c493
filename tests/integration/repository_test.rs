//! Integration tests for repository CRUD operations.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use docrepo_core::error::ErrorKind;
use docrepo_core::traits::{DocumentStore, Repository};
use docrepo_core::types::{Filter, FilterField, ListQuery, Patch, RawDocument};
use docrepo_database::{BaseRepository, MemoryStore};

use crate::helpers::{FailingStore, Person, TestRepo, ids};

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let app = TestRepo::new();

    let created = app
        .repo
        .create(&Person::new("Kari", 31, "Oslo"))
        .await
        .unwrap();
    let id = created.id.clone().expect("store assigns an id");

    let fetched = app.repo.get(&id).await.unwrap();
    assert_eq!(fetched, Some(created));
}

#[tokio::test]
async fn test_create_keeps_caller_id() {
    let app = TestRepo::new();

    let created = app
        .repo
        .create(&Person::with_id("kari", "Kari", 31, "Oslo"))
        .await
        .unwrap();

    assert_eq!(created.id.as_deref(), Some("kari"));
}

#[tokio::test]
async fn test_create_rejects_entity_without_identity() {
    #[derive(Debug, Serialize, serde::Deserialize)]
    struct Note {
        text: String,
    }

    impl docrepo_core::traits::Document for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> Option<&str> {
            None
        }
    }

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let notes = BaseRepository::<Note>::new(store);

    let err = notes
        .create(&Note {
            text: "remember".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Internal);
}

#[tokio::test]
async fn test_create_duplicate_id_is_a_store_write_error() {
    let app = TestRepo::seeded(1).await;

    let err = app
        .repo
        .create(&Person::with_id("p01", "Again", 1, "Oslo"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::StoreWrite);
}

#[tokio::test]
async fn test_generated_ids_sort_newest_first() {
    let app = TestRepo::new();
    let mut created = Vec::new();
    for name in ["first", "second", "third"] {
        created.push(app.repo.create(&Person::new(name, 40, "Bergen")).await.unwrap());
    }

    let page = app.repo.get_all(ListQuery::page(1)).await.unwrap();

    let names: Vec<&str> = page.records.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_get_missing_is_none() {
    let app = TestRepo::seeded(2).await;

    assert_eq!(app.repo.get("nope").await.unwrap(), None);
}

#[tokio::test]
async fn test_update_applies_patch() {
    let app = TestRepo::seeded(3).await;

    let updated = app
        .repo
        .update("p02", Patch::new().set("age", 50).set("city", "Stavanger"))
        .await
        .unwrap()
        .expect("p02 exists");

    assert_eq!(updated, Person::with_id("p02", "Person 2", 50, "Stavanger"));
    assert_eq!(app.repo.get("p02").await.unwrap(), Some(updated));
}

#[tokio::test]
async fn test_update_from_partial_struct() {
    #[derive(Serialize)]
    struct PersonChanges {
        age: Option<i64>,
        city: Option<String>,
    }

    let app = TestRepo::seeded(1).await;
    let patch = Patch::from_partial(&PersonChanges {
        age: Some(99),
        city: None,
    })
    .unwrap();

    let updated = app.repo.update("p01", patch).await.unwrap().unwrap();

    assert_eq!(updated.age, 99);
    assert_eq!(updated.city, "Oslo");
}

#[tokio::test]
async fn test_update_cannot_change_identity() {
    let app = TestRepo::seeded(1).await;

    let updated = app
        .repo
        .update("p01", Patch::new().set("_id", "hijacked").set("age", 1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.id.as_deref(), Some("p01"));
    assert_eq!(app.repo.get("hijacked").await.unwrap(), None);
}

#[tokio::test]
async fn test_update_missing_is_none() {
    let app = TestRepo::seeded(2).await;

    let updated = app
        .repo
        .update("nope", Patch::new().set("age", 1))
        .await
        .unwrap();

    assert_eq!(updated, None);
}

#[tokio::test]
async fn test_delete_reports_whether_removed() {
    let app = TestRepo::seeded(3).await;

    assert!(!app.repo.delete("nope").await.unwrap());
    assert!(app.repo.delete("p02").await.unwrap());
    assert!(!app.repo.delete("p02").await.unwrap());

    let remaining = app.repo.find(&Filter::all()).await.unwrap();
    assert_eq!(ids(&remaining), vec!["p01", "p03"]);
}

#[tokio::test]
async fn test_find_all_and_no_matches() {
    let app = TestRepo::seeded(5).await;

    let all = app.repo.find(&Filter::all()).await.unwrap();
    assert_eq!(ids(&all), vec!["p01", "p02", "p03", "p04", "p05"]);

    let none = app
        .repo
        .find(&Filter::from(FilterField::eq("city", "Atlantis")))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_find_one_returns_first_match() {
    let app = TestRepo::seeded(6).await;

    let found = app
        .repo
        .find_one(&Filter::from(FilterField::eq("city", "Bergen")))
        .await
        .unwrap();
    assert_eq!(found.and_then(|p| p.id), Some("p02".to_string()));

    let missing = app
        .repo
        .find_one(&Filter::from(FilterField::gt("age", 1000)))
        .await
        .unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn test_collections_are_isolated() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let people = BaseRepository::<Person>::new(store.clone());
    let archive = BaseRepository::<Person>::with_collection(store.clone(), "archived_people");

    people.create(&Person::with_id("a", "A", 1, "Oslo")).await.unwrap();
    archive.create(&Person::with_id("a", "A", 1, "Oslo")).await.unwrap();

    assert_eq!(people.collection(), "people");
    assert_eq!(archive.collection(), "archived_people");
    assert!(archive.delete("a").await.unwrap());
    assert!(people.get("a").await.unwrap().is_some());
}

#[tokio::test]
async fn test_raw_documents() {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let repo = BaseRepository::<RawDocument>::with_collection(store, "tickets");

    let serde_json::Value::Object(fields) = json!({"title": "Broken", "tags": ["a", "b"]}) else {
        unreachable!()
    };
    let created = repo.create(&RawDocument::from(fields)).await.unwrap();
    let id = created.fields()["_id"].as_str().unwrap().to_string();

    let found = repo
        .find(&Filter::from_json(&json!({"tags": {"$exists": true}})).unwrap())
        .await
        .unwrap();
    assert_eq!(found, vec![created]);
    assert!(repo.delete(&id).await.unwrap());
}

#[tokio::test]
async fn test_repository_trait_object() {
    let app = TestRepo::seeded(2).await;
    let repo: Arc<dyn Repository<Person>> = Arc::new(app.repo.clone());

    assert_eq!(repo.find(&Filter::all()).await.unwrap().len(), 2);
    let page = repo.get_all(ListQuery::page(1).page_size(1)).await.unwrap();
    assert_eq!(page.pagination.unwrap().total_pages, 2);
}

#[tokio::test]
async fn test_store_failures_keep_their_kind() {
    let store: Arc<dyn DocumentStore> = Arc::new(FailingStore);
    let repo = BaseRepository::<Person>::new(store);
    let person = Person::new("Kari", 31, "Oslo");

    let reads = [
        repo.get("x").await.unwrap_err(),
        repo.find_one(&Filter::all()).await.unwrap_err(),
        repo.find(&Filter::all()).await.unwrap_err(),
        repo.get_all(ListQuery::page(1)).await.unwrap_err(),
        repo.get_all(ListQuery::unpaginated()).await.unwrap_err(),
    ];
    for err in reads {
        assert_eq!(err.kind, ErrorKind::StoreRead, "{err}");
    }

    let writes = [
        repo.create(&person).await.unwrap_err(),
        repo.update("x", Patch::new().set("age", 1)).await.unwrap_err(),
        repo.delete("x").await.unwrap_err(),
    ];
    for err in writes {
        assert_eq!(err.kind, ErrorKind::StoreWrite, "{err}");
    }
}

#[tokio::test]
async fn test_undecodable_document_is_a_serialization_error() {
    let app = TestRepo::new();
    app.store
        .insert_one("people", json!({"_id": "bad", "name": "No age"}))
        .await
        .unwrap();

    let err = app.repo.get("bad").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Serialization);
}
