//! End-to-end tests for loading the category tree over HTTP.
//!
//! Each test starts its own mock server and drives a `CategoryTreeView`
//! through `spawn_load`, exactly as the TUI does.

use edutree::api::CategoryClient;
use edutree::app::{AppEvent, CategoryTreeView, EmptyState};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalogue() -> serde_json::Value {
    json!({
        "data": [
            {
                "id": 1,
                "name": "Technology",
                "slug": "technology",
                "isActive": true,
                "createdAt": "2024-02-01T09:00:00Z",
                "children": [
                    { "id": 2, "name": "Web Development", "slug": "web-dev", "children": [] },
                    { "id": 3, "name": "Databases", "isActive": false, "children": null }
                ]
            },
            { "id": 4, "name": "Languages", "description": "Spoken languages" }
        ]
    })
}

fn client_for(server: &MockServer) -> Arc<CategoryClient> {
    Arc::new(
        CategoryClient::new(&format!("{}/api", server.uri()), None, Duration::from_secs(5))
            .unwrap(),
    )
}

/// Run one load to completion and apply it to `view`.
async fn load(view: &mut CategoryTreeView, client: &Arc<CategoryClient>) -> bool {
    let (tx, mut rx) = mpsc::channel(4);
    view.spawn_load(Arc::clone(client), tx);
    match rx.recv().await {
        Some(AppEvent::CategoriesLoaded { generation, result }) => {
            view.apply_load(generation, result)
        }
        Some(AppEvent::TaskPanicked { error, .. }) => panic!("load panicked: {}", error),
        None => panic!("load task dropped its sender"),
    }
}

#[tokio::test]
async fn test_load_builds_tree_and_stats() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalogue()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = CategoryTreeView::new(1, Duration::from_millis(300));

    assert!(load(&mut view, &client).await);
    assert!(!view.is_loading());

    let stats = view.stats();
    assert_eq!((stats.total, stats.active, stats.inactive), (4, 3, 1));

    let tree = view.working_tree();
    assert_eq!(tree.len(), 2);
    assert_eq!(tree[0].id, "1");
    assert!(tree[0].expanded);
    assert!(!tree[0].children[0].expanded);
    assert!(!tree[0].children[1].is_active);
    assert_eq!(tree[1].description, "Spoken languages");
    assert_eq!(view.empty_state(), None);
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_tree() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalogue()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/categories/tree"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = CategoryTreeView::new(1, Duration::from_millis(300));
    assert!(load(&mut view, &client).await);
    let before = Arc::clone(view.working_tree());

    assert!(load(&mut view, &client).await);
    assert!(view.load_error().unwrap().contains("503"));
    assert!(Arc::ptr_eq(&before, view.working_tree()));
    assert_eq!(view.stats().total, 4);
    // A tree is still on screen, so no empty state.
    assert_eq!(view.empty_state(), None);
}

#[tokio::test]
async fn test_first_load_failure_shows_error_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = CategoryTreeView::new(1, Duration::from_millis(300));
    assert!(load(&mut view, &client).await);
    assert!(matches!(view.empty_state(), Some(EmptyState::LoadFailed(_))));
    assert_eq!(view.stats().total, 0);
}

#[tokio::test]
async fn test_search_survives_reload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/tree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalogue()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = CategoryTreeView::new(0, Duration::from_millis(300));
    assert!(load(&mut view, &client).await);

    view.on_search_change("web");
    assert!(view.flush_search());
    assert!(view.working_tree()[1].hidden);

    assert!(load(&mut view, &client).await);
    assert_eq!(view.active_search(), "web");
    let tree = view.working_tree();
    assert!(!tree[0].hidden);
    assert!(tree[0].expanded);
    assert!(tree[1].hidden);
}

#[tokio::test]
async fn test_superseded_load_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/tree"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(catalogue())
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut view = CategoryTreeView::new(1, Duration::from_millis(300));
    let (tx, mut rx) = mpsc::channel(4);

    let first = view.spawn_load(Arc::clone(&client), tx.clone());
    let second = view.spawn_load(Arc::clone(&client), tx);
    assert!(second > first);

    // The first task was aborted, so only the second result arrives.
    match rx.recv().await {
        Some(AppEvent::CategoriesLoaded { generation, result }) => {
            assert_eq!(generation, second);
            assert!(view.apply_load(generation, result));
        }
        _ => panic!("expected CategoriesLoaded"),
    }
    assert!(!view.is_loading());
    assert_eq!(view.stats().total, 4);
}
