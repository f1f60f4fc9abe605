//! Service tests over the in-memory repository
//!
//! These exercise the catalog contract end to end without a database:
//! - create / find / update / delete round trips
//! - empty results for missing products
//! - ordering, limits and rating statistics of the products-with-reviews read

use chrono::{Duration, TimeZone, Utc};
use domain_catalog::*;
use test_utils::{assertions::*, TestDataBuilder};
use uuid::Uuid;

fn payload(name: &str, categories: &[&str]) -> CreateProduct {
    CreateProduct {
        name: name.to_string(),
        description: Some("Integration test product".to_string()),
        image: Some("https://cdn.example.com/p.png".to_string()),
        price: 1999,
        old_price: Some(2499),
        credit: None,
        categories: categories.iter().map(|c| c.to_string()).collect(),
        tags: vec!["test".to_string()],
        advantages: None,
        disadvantages: Some("None found".to_string()),
        characteristics: vec![ProductCharacteristic {
            name: "weight".to_string(),
            value: "1kg".to_string(),
        }],
    }
}

fn service() -> (CatalogService<InMemoryCatalogRepository>, InMemoryCatalogRepository) {
    let repo = InMemoryCatalogRepository::new();
    (CatalogService::new(repo.clone()), repo)
}

fn review_at(product_id: Uuid, rating: i32, minute: i64) -> Review {
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    Review::new(product_id, rating).with_created_at(t0 + Duration::minutes(minute))
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn test_create_then_find_returns_payload() {
    let (service, _) = service();
    let builder = TestDataBuilder::from_test_name("create_then_find");
    let input = payload(&builder.name("product", "main"), &["books"]);

    let created = service.create(input.clone()).await.unwrap();
    let found = service.find_by_id(&created.id.to_string()).await.unwrap();
    let found = assert_some(found, "created product should be found");

    assert_uuid_eq(found.id, created.id, "found id");
    assert_eq!(found.attributes(), input);
    assert_eq!(found.created_at, created.created_at);
}

#[tokio::test]
async fn test_find_missing_is_none() {
    let (service, _) = service();
    let found = service.find_by_id(&Uuid::now_v7().to_string()).await.unwrap();
    assert_none(found, "unknown key");
}

#[tokio::test]
async fn test_delete_returns_prior_record_then_none() {
    let (service, _) = service();
    let created = service
        .create(payload("Chair", &["furniture"]))
        .await
        .unwrap();
    let key = created.id.to_string();

    let deleted = service.delete_by_id(&key).await.unwrap();
    assert_eq!(assert_some(deleted, "deleted record"), created);

    assert_none(service.find_by_id(&key).await.unwrap(), "after delete");
    assert_none(service.delete_by_id(&key).await.unwrap(), "second delete");
}

#[tokio::test]
async fn test_delete_does_not_cascade_to_reviews() {
    let (service, repo) = service();
    let product = service.create(payload("Pen", &["office"])).await.unwrap();
    repo.insert_review(review_at(product.id, 5, 0)).await;

    service.delete_by_id(&product.id.to_string()).await.unwrap();

    let result = service
        .find_with_reviews(FindProduct {
            category: "office".to_string(),
            limit: 10,
        })
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_update_replaces_attributes_and_is_idempotent() {
    let (service, _) = service();
    let created = service.create(payload("Lamp", &["home"])).await.unwrap();
    let key = created.id.to_string();

    let mut update = payload("Desk Lamp", &["home", "lighting"]);
    update.old_price = None;
    update.characteristics.clear();

    let first = service.update_by_id(&key, update.clone()).await.unwrap();
    let first = assert_some(first, "first update");
    let second = service.update_by_id(&key, update.clone()).await.unwrap();
    let second = assert_some(second, "second update");

    assert_eq!(first, second);
    assert_eq!(second.attributes(), update);
    assert_eq!(second.id, created.id);
    assert_eq!(second.created_at, created.created_at);
}

#[tokio::test]
async fn test_update_missing_is_none() {
    let (service, _) = service();
    let key = Uuid::now_v7().to_string();
    let result = service
        .update_by_id(&key, payload("Ghost", &["none"]))
        .await
        .unwrap();
    assert_none(result, "update of unknown key");
    assert_none(service.find_by_id(&key).await.unwrap(), "no upsert");
}

// ============================================================================
// Products with reviews
// ============================================================================

#[tokio::test]
async fn test_find_with_reviews_scenario() {
    let (service, repo) = service();

    let a = service.create(payload("A", &["books"])).await.unwrap();
    let b = service.create(payload("B", &["books"])).await.unwrap();
    service.create(payload("C", &["toys"])).await.unwrap();
    let (p1, p2) = if a.id < b.id { (a, b) } else { (b, a) };

    let r1 = review_at(p1.id, 4, 0);
    let r2 = review_at(p1.id, 2, 30);
    repo.insert_review(r1.clone()).await;
    repo.insert_review(r2.clone()).await;

    let result = service
        .find_with_reviews(FindProduct {
            category: "books".to_string(),
            limit: 10,
        })
        .await
        .unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].product, p1);
    assert_eq!(result[1].product, p2);

    assert_eq!(result[0].review_count, 2);
    assert_close(result[0].review_avg.unwrap(), 3.0, "P1 average");
    assert_eq!(result[0].reviews, vec![r2, r1]);

    assert_eq!(result[1].review_count, 0);
    assert_eq!(result[1].review_avg, None);
}

#[tokio::test]
async fn test_find_with_reviews_respects_limit_and_invariants() {
    let (service, repo) = service();

    for i in 0..6 {
        let product = service
            .create(payload(&format!("Item {}", i), &["sale", "misc"]))
            .await
            .unwrap();
        for j in 0..i {
            repo.insert_review(review_at(product.id, 1 + (j % 5) as i32, (j * 7 % 11) as i64))
                .await;
        }
    }

    let result = service
        .find_with_reviews(FindProduct {
            category: "sale".to_string(),
            limit: 4,
        })
        .await
        .unwrap();

    assert_eq!(result.len(), 4);
    assert!(result.windows(2).all(|w| w[0].product.id < w[1].product.id));
    for item in &result {
        assert!(item.product.has_category("sale"));
        assert_eq!(item.review_count, item.reviews.len() as u64);
        assert_eq!(item.review_avg.is_none(), item.review_count == 0);
        assert!(
            item.reviews
                .windows(2)
                .all(|w| w[0].created_at >= w[1].created_at)
        );
    }
}

#[tokio::test]
async fn test_find_with_reviews_no_match_is_empty() {
    let (service, _) = service();
    service.create(payload("Ball", &["toys"])).await.unwrap();

    let result = service
        .find_with_reviews(FindProduct {
            category: "books".to_string(),
            limit: 5,
        })
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_find_with_reviews_rejects_bad_filter() {
    let (service, _) = service();
    let result = service
        .find_with_reviews(FindProduct {
            category: "books".to_string(),
            limit: 0,
        })
        .await;
    assert!(matches!(result, Err(CatalogError::Validation(_))));
}
