//! Integration tests for paginated listing.

use serde_json::json;

use docrepo_core::error::ErrorKind;
use docrepo_core::types::{Filter, FilterField, ListQuery, Pagination, Sort, SortField};

use crate::helpers::{TestRepo, ids};

fn pagination(page: u64, page_size: u64, total: u64, total_pages: u64) -> Option<Pagination> {
    Some(Pagination {
        page,
        page_size,
        total,
        total_pages,
    })
}

#[tokio::test]
async fn test_first_page_of_twenty_five() {
    let app = TestRepo::seeded(25).await;

    let page = app.repo.get_all(ListQuery::page(1).page_size(10)).await.unwrap();

    assert_eq!(page.records.len(), 10);
    assert_eq!(page.pagination, pagination(1, 10, 25, 3));
    assert_eq!(ids(&page.records)[0], "p25");
    assert_eq!(ids(&page.records)[9], "p16");
}

#[tokio::test]
async fn test_last_partial_page() {
    let app = TestRepo::seeded(25).await;

    let page = app.repo.get_all(ListQuery::page(3).page_size(10)).await.unwrap();

    assert_eq!(ids(&page.records), vec!["p05", "p04", "p03", "p02", "p01"]);
    assert_eq!(page.pagination, pagination(3, 10, 25, 3));
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = TestRepo::seeded(25).await;

    let page = app.repo.get_all(ListQuery::page(4).page_size(10)).await.unwrap();

    assert!(page.records.is_empty());
    assert_eq!(page.pagination, pagination(4, 10, 25, 3));
}

#[tokio::test]
async fn test_page_zero_returns_everything_without_metadata() {
    let app = TestRepo::seeded(25).await;

    let page = app
        .repo
        .get_all(ListQuery::unpaginated().page_size(3))
        .await
        .unwrap();

    assert_eq!(page.records.len(), 25);
    assert_eq!(page.pagination, None);
    assert_eq!(serde_json::to_value(&page).unwrap()["pagination"], json!({}));
}

#[tokio::test]
async fn test_default_page_size_applies() {
    let app = TestRepo::seeded(12).await;

    let page = app.repo.get_all(ListQuery::default()).await.unwrap();

    assert_eq!(page.records.len(), 10);
    assert_eq!(page.pagination, pagination(1, 10, 12, 2));
}

#[tokio::test]
async fn test_search_applies_to_total_and_records() {
    let app = TestRepo::seeded(25).await;

    let page = app
        .repo
        .get_all(
            ListQuery::page(1)
                .page_size(4)
                .search(Filter::from(FilterField::eq("city", "Oslo"))),
        )
        .await
        .unwrap();

    // p01, p04, ..., p25
    assert_eq!(page.pagination, pagination(1, 4, 9, 3));
    assert_eq!(ids(&page.records), vec!["p25", "p22", "p19", "p16"]);
    assert!(page.records.iter().all(|p| p.city == "Oslo"));
}

#[tokio::test]
async fn test_search_from_json_predicate() {
    let app = TestRepo::seeded(25).await;
    let search = Filter::from_json(&json!({"age": {"$gte": 40}, "city": {"$ne": "Oslo"}})).unwrap();

    let page = app
        .repo
        .get_all(ListQuery::page(1).page_size(10).search(search))
        .await
        .unwrap();

    // ages 40..=44 are p21..=p25; p22 and p25 live in Oslo
    assert_eq!(ids(&page.records), vec!["p24", "p23", "p21"]);
    assert_eq!(page.pagination, pagination(1, 10, 3, 1));
}

#[tokio::test]
async fn test_explicit_sort() {
    let app = TestRepo::seeded(6).await;

    let page = app
        .repo
        .get_all(
            ListQuery::page(1)
                .page_size(6)
                .sort(Sort::by(SortField::asc("city")).then(SortField::desc("age"))),
        )
        .await
        .unwrap();

    // Bergen: p02 p05, Oslo: p01 p04, Tromsø: p03 p06
    assert_eq!(
        ids(&page.records),
        vec!["p05", "p02", "p04", "p01", "p06", "p03"]
    );
}

#[tokio::test]
async fn test_projection_keeps_identity() {
    let app = TestRepo::seeded(3).await;

    let page = app
        .repo
        .get_all_documents(ListQuery::page(1).select_fields("name"))
        .await
        .unwrap();

    assert_eq!(
        page.records,
        vec![
            json!({"_id": "p03", "name": "Person 3"}),
            json!({"_id": "p02", "name": "Person 2"}),
            json!({"_id": "p01", "name": "Person 1"}),
        ]
    );
}

#[tokio::test]
async fn test_empty_select_returns_all_fields() {
    let app = TestRepo::seeded(1).await;

    let page = app
        .repo
        .get_all_documents(ListQuery::page(1).select_fields(" , "))
        .await
        .unwrap();

    assert_eq!(
        page.records,
        vec![json!({"_id": "p01", "name": "Person 1", "age": 20, "city": "Oslo"})]
    );
}

#[tokio::test]
async fn test_zero_page_size_is_rejected() {
    let app = TestRepo::seeded(3).await;

    let err = app
        .repo
        .get_all(ListQuery::page(1).page_size(0))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_concurrent_listings_report_their_own_totals() {
    let app = TestRepo::seeded(25).await;
    let oslo = ListQuery::page(1).search(Filter::from(FilterField::eq("city", "Oslo")));
    let adults = ListQuery::page(1).search(Filter::from(FilterField::gte("age", 30)));
    let everyone = ListQuery::page(2);

    let (oslo, adults, everyone) = tokio::join!(
        app.repo.get_all(oslo),
        app.repo.get_all(adults),
        app.repo.get_all(everyone),
    );

    assert_eq!(oslo.unwrap().pagination.unwrap().total, 9);
    assert_eq!(adults.unwrap().pagination.unwrap().total, 15);
    assert_eq!(everyone.unwrap().pagination, pagination(2, 10, 25, 3));
}

#[tokio::test]
async fn test_concurrent_listings_across_tasks() {
    let app = TestRepo::seeded(25).await;

    let handles: Vec<_> = (0..CITY_COUNT)
        .map(|i| {
            let repo = app.repo.clone();
            let city = crate::helpers::CITIES[i];
            tokio::spawn(async move {
                repo.get_all(ListQuery::page(1).search(Filter::from(FilterField::eq("city", city))))
                    .await
            })
        })
        .collect();

    let totals: Vec<u64> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap().pagination.unwrap().total)
        .collect();

    assert_eq!(totals, vec![9, 8, 8]);
}

const CITY_COUNT: usize = crate::helpers::CITIES.len();
