// SPDX-License-Identifier: Apache-2.0

use immoline_model::{PropertyDraft, PropertyPatch, PropertyStatus, PropertyType};
use immoline_query::{PageWindow, PropertyFilter};
use immoline_store::{PropertyStore, StoreError};

fn draft(title: &str, city: &str, price: f64) -> PropertyDraft {
    PropertyDraft {
        title: title.to_string(),
        description: "Un bel espace lumineux".to_string(),
        city: city.to_string(),
        address: "5 rue Victor Hugo".to_string(),
        price,
        surface: 45.0,
        rooms: 2,
        bedrooms: 1,
        bathrooms: 1,
        property_type: "loft".to_string(),
        status: "disponible".to_string(),
        image_url: None,
    }
}

async fn seeded_store() -> PropertyStore {
    let store = PropertyStore::open_in_memory().expect("open store");
    for i in 0..15 {
        let city = if i % 3 == 0 { "Lyon" } else { "Paris" };
        store
            .create(&draft(&format!("Bien {i}"), city, 100_000.0 + f64::from(i) * 10_000.0))
            .await
            .expect("seed");
    }
    store
}

#[tokio::test]
async fn create_then_find_round_trips_the_payload() {
    let store = PropertyStore::open_in_memory().expect("open store");
    let input = draft("Loft clair", "Lyon", 250_000.0);
    let created = store.create(&input).await.expect("create");

    assert!(created.id >= 1);
    assert_eq!(created.title, input.title);
    assert_eq!(created.city, input.city);
    assert_eq!(created.property_type, PropertyType::Loft);
    assert_eq!(created.status, PropertyStatus::Disponible);
    assert!(created.bedrooms <= created.rooms);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = store.find_by_id(created.id).await.expect("find");
    assert_eq!(fetched, created);

    // idempotent: a second read without mutation returns identical data
    let again = store.find_by_id(created.id).await.expect("find again");
    assert_eq!(again, fetched);
}

#[tokio::test]
async fn create_rejects_invalid_payload_with_every_violation() {
    let store = PropertyStore::open_in_memory().expect("open store");
    let mut bad = draft("X", "Lyon", 500.0);
    bad.bedrooms = 4;
    let err = store.create(&bad).await.expect_err("invalid create");
    match err {
        StoreError::Validation(errors) => {
            assert!(errors.contains_key("title"));
            assert!(errors.contains_key("price"));
            assert!(errors.contains_key("bedrooms"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn find_by_id_reports_not_found() {
    let store = PropertyStore::open_in_memory().expect("open store");
    assert!(matches!(
        store.find_by_id(4242).await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn find_all_pages_respect_limit_and_ordering() {
    let store = seeded_store().await;
    let window = PageWindow { page: 1, limit: 10 };
    let page = store
        .find_all(&PropertyFilter::default(), &window)
        .await
        .expect("page 1");

    assert_eq!(page.properties.len(), 10);
    assert_eq!(page.pagination.total, 15);
    assert_eq!(page.pagination.total_pages, 2);

    // newest first, id descending breaks creation-time ties
    let ids: Vec<i64> = page.properties.iter().map(|p| p.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);

    let last = store
        .find_all(&PropertyFilter::default(), &PageWindow { page: 2, limit: 10 })
        .await
        .expect("page 2");
    assert_eq!(last.properties.len(), 5);
    assert_eq!(last.pagination.total, 15);
}

#[tokio::test]
async fn find_all_total_is_independent_of_the_window() {
    let store = seeded_store().await;
    let filter = PropertyFilter {
        city: Some("Lyon".to_string()),
        ..PropertyFilter::default()
    };
    let small = store
        .find_all(&filter, &PageWindow { page: 1, limit: 2 })
        .await
        .expect("small window");
    let large = store
        .find_all(&filter, &PageWindow { page: 1, limit: 50 })
        .await
        .expect("large window");

    assert_eq!(small.pagination.total, large.pagination.total);
    assert_eq!(small.properties.len(), 2);
    assert!(small
        .properties
        .iter()
        .all(|p| p.city.contains("Lyon")));
}

#[tokio::test]
async fn find_all_filters_are_anded() {
    let store = seeded_store().await;
    store
        .create(&{
            let mut d = draft("Villa familiale", "Lyon", 900_000.0);
            d.property_type = "villa".to_string();
            d.rooms = 6;
            d.bedrooms = 4;
            d.surface = 180.0;
            d
        })
        .await
        .expect("villa");

    let filter = PropertyFilter {
        city: Some("Lyon".to_string()),
        min_price: Some(500_000.0),
        property_type: Some(PropertyType::Villa),
        min_rooms: Some(5),
        min_surface: Some(100.0),
        ..PropertyFilter::default()
    };
    let page = store
        .find_all(&filter, &PageWindow::default())
        .await
        .expect("filtered");
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.properties[0].title, "Villa familiale");
}

#[tokio::test]
async fn find_all_empty_result_has_zero_pages() {
    let store = seeded_store().await;
    let filter = PropertyFilter {
        city: Some("Marseille".to_string()),
        ..PropertyFilter::default()
    };
    let page = store
        .find_all(&filter, &PageWindow::default())
        .await
        .expect("empty");
    assert!(page.properties.is_empty());
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.total_pages, 0);
}

#[tokio::test]
async fn city_filter_matches_substrings_only_literally() {
    let store = PropertyStore::open_in_memory().expect("open store");
    store
        .create(&draft("Appart", "Lyon 3e", 120_000.0))
        .await
        .expect("create");

    let contains = PropertyFilter {
        city: Some("yon".to_string()),
        ..PropertyFilter::default()
    };
    let hit = store
        .find_all(&contains, &PageWindow::default())
        .await
        .expect("contains");
    assert_eq!(hit.pagination.total, 1);

    // LIKE metacharacters in the filter must not act as wildcards
    let wildcard = PropertyFilter {
        city: Some("L%n".to_string()),
        ..PropertyFilter::default()
    };
    let miss = store
        .find_all(&wildcard, &PageWindow::default())
        .await
        .expect("wildcard");
    assert_eq!(miss.pagination.total, 0);
}

#[tokio::test]
async fn update_touches_only_supplied_fields_and_updated_at() {
    let store = PropertyStore::open_in_memory().expect("open store");
    let created = store
        .create(&draft("Loft clair", "Lyon", 250_000.0))
        .await
        .expect("create");

    let patch = PropertyPatch {
        price: Some(2000.0),
        ..PropertyPatch::default()
    };
    let updated = store.update(created.id, &patch).await.expect("update");

    assert_eq!(updated.price, 2000.0);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.city, created.city);
    assert_eq!(updated.rooms, created.rooms);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    let store = PropertyStore::open_in_memory().expect("open store");
    let patch = PropertyPatch {
        price: Some(2000.0),
        ..PropertyPatch::default()
    };
    assert!(matches!(
        store.update(99, &patch).await,
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn update_rechecks_cross_field_rule_against_stored_values() {
    let store = PropertyStore::open_in_memory().expect("open store");
    let created = store
        .create(&draft("Loft clair", "Lyon", 250_000.0))
        .await
        .expect("create");
    // stored rooms is 2; raising bedrooms alone must trip the merged rule
    let patch = PropertyPatch {
        bedrooms: Some(3),
        ..PropertyPatch::default()
    };
    let err = store
        .update(created.id, &patch)
        .await
        .expect_err("merged cross-field");
    match err {
        StoreError::Validation(errors) => assert!(errors.contains_key("bedrooms")),
        other => panic!("expected validation error, got {other:?}"),
    }

    // raising both sides consistently is fine
    let patch = PropertyPatch {
        rooms: Some(4),
        bedrooms: Some(3),
        ..PropertyPatch::default()
    };
    let updated = store.update(created.id, &patch).await.expect("update");
    assert_eq!(updated.rooms, 4);
    assert_eq!(updated.bedrooms, 3);
}

#[tokio::test]
async fn empty_patch_returns_the_record_untouched() {
    let store = PropertyStore::open_in_memory().expect("open store");
    let created = store
        .create(&draft("Loft clair", "Lyon", 250_000.0))
        .await
        .expect("create");
    let unchanged = store
        .update(created.id, &PropertyPatch::default())
        .await
        .expect("empty patch");
    assert_eq!(unchanged, created);
}

#[tokio::test]
async fn delete_removes_the_record_and_is_not_idempotent() {
    let store = PropertyStore::open_in_memory().expect("open store");
    let created = store
        .create(&draft("Loft clair", "Lyon", 250_000.0))
        .await
        .expect("create");

    store.delete(created.id).await.expect("delete");
    assert!(matches!(
        store.find_by_id(created.id).await,
        Err(StoreError::NotFound)
    ));
    assert!(matches!(
        store.delete(created.id).await,
        Err(StoreError::NotFound)
    ));
}
