//! Integration tests for `SpotList` against a wiremock backend.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use goodwave_app::{ListError, ListPhase, LoadOutcome, SpotList};
use goodwave_client::{ClientError, SpotClient};
use goodwave_core::{SpotFilter, SpotId};

fn spot_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("Spot {id}"),
        "location": if id % 2 == 0 { "Hossegor, France" } else { "Ericeira, Portugal" },
        "type": if id % 3 == 0 { "reef" } else { "beach" },
        "level": "beginner"
    })
}

fn page_json(ids: std::ops::RangeInclusive<i64>, current: u32) -> serde_json::Value {
    json!({
        "data": ids.map(spot_json).collect::<Vec<_>>(),
        "links": [
            { "url": null, "label": "&laquo; Previous", "active": false },
            { "url": "http://h/spots?page=1", "label": "1", "active": current == 1 },
            { "url": "http://h/spots?page=2", "label": "2", "active": current == 2 },
            { "url": "http://h/spots?page=3", "label": "3", "active": current == 3 },
            { "url": "http://h/spots?page=2", "label": "Next &raquo;", "active": false }
        ],
        "meta": { "current_page": current, "last_page": 3, "per_page": 10, "total": 25 }
    })
}

async fn mount_page(server: &MockServer, page: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/spots"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_favorites(server: &MockServer, ids: &[i64]) {
    let favorites: Vec<_> = ids.iter().copied().map(spot_json).collect();
    Mock::given(method("GET"))
        .and(path("/users/1/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(favorites))
        .mount(server)
        .await;
}

fn spot_list(server: &MockServer) -> SpotList {
    let client = SpotClient::with_base_url(&server.uri(), 1, 5, "goodwave-test/0.1")
        .expect("failed to build test SpotClient");
    SpotList::new(client, 10)
}

fn saved_ids(list: &SpotList) -> Vec<String> {
    list.snapshot()
        .spots
        .iter()
        .filter(|s| s.saved)
        .map(|s| s.id.to_string())
        .collect()
}

#[tokio::test]
async fn first_then_next_page_end_to_end() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    // Page 2 overlaps page 1 by one id.
    mount_page(&server, 2, page_json(10..=19, 2)).await;
    mount_favorites(&server, &[3, 15]).await;

    let list = spot_list(&server);
    let outcome = list.load_first_page().await.expect("first page");
    assert_eq!(outcome, LoadOutcome::Loaded { added: 10 });

    let snap = list.snapshot();
    assert_eq!(snap.phase, ListPhase::Ready);
    assert_eq!(snap.spots.len(), 10);
    assert_eq!(snap.current_page, 1);
    assert_eq!(snap.total_pages, 3);
    assert!(snap.error.is_none());

    let outcome = list.load_next_page().await.expect("second page");
    assert_eq!(outcome, LoadOutcome::Loaded { added: 9 });

    let snap = list.snapshot();
    assert_eq!(snap.phase, ListPhase::Ready);
    assert_eq!(snap.spots.len(), 19);
    assert_eq!(snap.current_page, 2);
    assert_eq!(snap.spots[18].id, SpotId::new("19"));
    assert_eq!(saved_ids(&list), ["3", "15"]);
}

#[tokio::test]
async fn favorites_failure_does_not_fail_the_load() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    Mock::given(method("GET"))
        .and(path("/users/1/favorites"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let list = spot_list(&server);
    list.load_first_page().await.expect("page load must succeed");

    let snap = list.snapshot();
    assert_eq!(snap.phase, ListPhase::Ready);
    assert_eq!(snap.spots.len(), 10);
    assert!(snap.error.is_none());
    assert!(snap.spots.iter().all(|s| !s.saved));
}

#[tokio::test]
async fn first_page_failure_surfaces_error_with_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spots"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_favorites(&server, &[]).await;

    let list = spot_list(&server);
    let err = list.load_first_page().await.unwrap_err();
    assert!(matches!(err, ClientError::BadStatus { status: 503, .. }));

    let snap = list.snapshot();
    assert_eq!(snap.phase, ListPhase::Error);
    assert!(snap.spots.is_empty());
    assert!(snap.error.is_some());
    assert!(!snap.is_loading);
}

#[tokio::test]
async fn next_page_failure_keeps_loaded_spots() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    Mock::given(method("GET"))
        .and(path("/spots"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 11, "name": "No level" }]
        })))
        .mount(&server)
        .await;
    mount_favorites(&server, &[]).await;

    let list = spot_list(&server);
    list.load_first_page().await.unwrap();
    let err = list.load_next_page().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));

    let snap = list.snapshot();
    assert_eq!(snap.phase, ListPhase::Error);
    assert_eq!(snap.spots.len(), 10);
    assert_eq!(snap.current_page, 1);
    assert!(!snap.is_loading);
}

#[tokio::test]
async fn next_page_before_first_load_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(1..=10, 1)))
        .expect(0)
        .mount(&server)
        .await;

    let list = spot_list(&server);
    assert_eq!(list.load_next_page().await.unwrap(), LoadOutcome::Skipped);
    assert_eq!(list.snapshot().phase, ListPhase::Idle);
}

#[tokio::test]
async fn concurrent_next_page_requests_issue_one_fetch() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    Mock::given(method("GET"))
        .and(path("/spots"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(11..=20, 2))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_favorites(&server, &[]).await;

    let list = spot_list(&server);
    list.load_first_page().await.unwrap();

    let (a, b) = tokio::join!(list.load_next_page(), list.load_next_page());
    let mut outcomes = [a.unwrap(), b.unwrap()];
    outcomes.sort_by_key(|o| matches!(o, LoadOutcome::Skipped));
    assert_eq!(outcomes, [LoadOutcome::Loaded { added: 10 }, LoadOutcome::Skipped]);
    assert_eq!(list.snapshot().spots.len(), 20);
}

#[tokio::test]
async fn refresh_supersedes_in_flight_next_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    Mock::given(method("GET"))
        .and(path("/spots"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(11..=20, 2))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_favorites(&server, &[]).await;

    let list = spot_list(&server);
    list.load_first_page().await.unwrap();

    let (next, refreshed) = tokio::join!(list.load_next_page(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        list.refresh().await
    });

    assert_eq!(refreshed.unwrap(), LoadOutcome::Loaded { added: 10 });
    assert_eq!(next.unwrap(), LoadOutcome::Superseded);

    let snap = list.snapshot();
    assert_eq!(snap.phase, ListPhase::Ready);
    assert_eq!(snap.spots.len(), 10);
    assert_eq!(snap.current_page, 1);
}

#[tokio::test]
async fn toggle_saved_changes_exactly_one_spot() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    mount_favorites(&server, &[]).await;
    Mock::given(method("POST"))
        .and(path("/users/1/favorites/4"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let list = spot_list(&server);
    list.load_first_page().await.unwrap();
    let before = list.snapshot();

    let now_saved = list.toggle_saved(&SpotId::new("4")).await.expect("toggle");
    assert!(now_saved);

    let after = list.snapshot();
    for (old, new) in before.spots.iter().zip(&after.spots) {
        if old.id == SpotId::new("4") {
            assert!(new.saved);
        } else {
            assert_eq!(old, new);
        }
    }
    assert_eq!(after.current_page, before.current_page);
    assert_eq!(after.phase, ListPhase::Ready);
}

#[tokio::test]
async fn toggle_saved_removes_an_existing_favorite() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    mount_favorites(&server, &[2]).await;
    Mock::given(method("DELETE"))
        .and(path("/users/1/favorites/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let list = spot_list(&server);
    list.load_first_page().await.unwrap();
    assert_eq!(saved_ids(&list), ["2"]);

    assert!(!list.toggle_saved(&SpotId::new("2")).await.unwrap());
    assert!(saved_ids(&list).is_empty());
}

#[tokio::test]
async fn toggle_failure_surfaces_error_and_keeps_spot() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    mount_favorites(&server, &[]).await;
    Mock::given(method("POST"))
        .and(path("/users/1/favorites/4"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let list = spot_list(&server);
    list.load_first_page().await.unwrap();
    let before = list.snapshot();

    let err = list.toggle_saved(&SpotId::new("4")).await.unwrap_err();
    assert!(matches!(
        err,
        ListError::Client(ClientError::BadStatus { status: 500, .. })
    ));

    let after = list.snapshot();
    assert_eq!(after.spots, before.spots);
    assert_eq!(after.phase, ListPhase::Ready);
    assert!(after.error.is_some());
}

#[tokio::test]
async fn toggle_unknown_spot_makes_no_request() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    mount_favorites(&server, &[]).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let list = spot_list(&server);
    list.load_first_page().await.unwrap();

    let err = list.toggle_saved(&SpotId::new("999")).await.unwrap_err();
    assert!(matches!(err, ListError::UnknownSpot(id) if id == SpotId::new("999")));
}

#[tokio::test]
async fn spot_detail_is_reconciled_and_replaces_loaded_copy() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    mount_favorites(&server, &[5]).await;
    Mock::given(method("GET"))
        .and(path("/spots/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": 5,
                "name": "Spot 5 (renamed)",
                "location": "Ericeira, Portugal",
                "type": "point",
                "level": "advanced"
            }
        })))
        .mount(&server)
        .await;

    let list = spot_list(&server);
    list.load_first_page().await.unwrap();

    let spot = list.spot(&SpotId::new("5")).await.expect("detail");
    assert!(spot.saved);
    assert_eq!(spot.difficulty(), 5);
    assert_eq!(list.snapshot().spots[4].name, "Spot 5 (renamed)");
}

#[tokio::test]
async fn filtered_applies_type_search_and_saved() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    mount_favorites(&server, &[6, 7]).await;

    let list = spot_list(&server);
    list.load_first_page().await.unwrap();

    let reefs = list.filtered(&SpotFilter {
        spot_type: Some("reef".to_owned()),
        ..SpotFilter::default()
    });
    let ids: Vec<String> = reefs.iter().map(|s| s.id.to_string()).collect();
    assert_eq!(ids, ["3", "6", "9"]);

    let saved_in_france = list.filtered(&SpotFilter {
        search: Some("france".to_owned()),
        saved_only: true,
        ..SpotFilter::default()
    });
    let ids: Vec<String> = saved_in_france.iter().map(|s| s.id.to_string()).collect();
    assert_eq!(ids, ["6"]);
}

#[tokio::test]
async fn subscribers_observe_published_snapshots() {
    let server = MockServer::start().await;
    mount_page(&server, 1, page_json(1..=10, 1)).await;
    mount_favorites(&server, &[]).await;

    let list = spot_list(&server);
    let mut rx = list.subscribe();
    assert_eq!(rx.borrow().phase, ListPhase::Idle);

    list.load_first_page().await.unwrap();

    assert!(rx.has_changed().unwrap());
    let seen = rx.borrow_and_update().clone();
    assert_eq!(seen, list.snapshot());
    assert_eq!(seen.spots.len(), 10);
}

#[tokio::test]
async fn skipped_next_page_publishes_nothing() {
    let server = MockServer::start().await;
    let mut single = page_json(1..=4, 1);
    single["meta"]["last_page"] = json!(1);
    mount_page(&server, 1, single).await;
    mount_favorites(&server, &[]).await;

    let list = spot_list(&server);
    let mut rx = list.subscribe();

    assert_eq!(list.load_next_page().await.unwrap(), LoadOutcome::Skipped);
    assert!(!rx.has_changed().unwrap());

    list.load_first_page().await.unwrap();
    rx.borrow_and_update();

    assert_eq!(list.load_next_page().await.unwrap(), LoadOutcome::Skipped);
    assert!(!rx.has_changed().unwrap());
    assert_eq!(rx.borrow().spots.len(), 4);
}
