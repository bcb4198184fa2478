//! Local API tests

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use cloudpulse::authn::session::{AcceptAll, Session};
use cloudpulse::cache::feeds::FeedCache;
use cloudpulse::notify::store::{MemoryPersistence, NotificationStore, DEFAULT_CAPACITY};
use cloudpulse::server::serve::router;
use cloudpulse::server::state::ServerState;

use crate::common::{record, sync_summary, FakeBackend};

struct Harness {
    app: Router,
    store: Arc<NotificationStore>,
    feeds: Arc<FeedCache>,
    session: Arc<Session>,
}

fn harness(backend: FakeBackend) -> Harness {
    let store = Arc::new(NotificationStore::new(
        Arc::new(MemoryPersistence::new()),
        DEFAULT_CAPACITY,
    ));
    let session = Arc::new(Session::new());
    let feeds = Arc::new(FeedCache::new());
    let state = ServerState::new(
        store.clone(),
        session.clone(),
        feeds.clone(),
        Arc::new(backend),
        Arc::new(AcceptAll),
    );
    Harness {
        app: router(Arc::new(state)),
        store,
        feeds,
        session,
    }
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let h = harness(FakeBackend::default());
    let (status, body) = call(&h.app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_notification_lifecycle() {
    let h = harness(FakeBackend::default());

    let (status, created) = call(
        &h.app,
        Method::POST,
        "/notifications",
        Some(json!({
            "type": "success",
            "title": "AWS Connected",
            "message": "Credentials verified",
            "provider": "aws"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["relativeTime"], "Just now");
    assert_eq!(created["source"], "system");
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("system-"));

    let (_, list) = call(&h.app, Method::GET, "/notifications", None).await;
    assert_eq!(list["unreadCount"], 1);
    assert_eq!(list["notifications"][0]["title"], "AWS Connected");

    let (status, _) = call(&h.app, Method::POST, "/notifications/read-all", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, count) = call(&h.app, Method::GET, "/notifications/unread-count", None).await;
    assert_eq!(count["unreadCount"], 0);

    let uri = format!("/notifications/{}", id);
    let (status, _) = call(&h.app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&h.app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_invalid_notification_is_rejected() {
    let h = harness(FakeBackend::default());
    let (status, body) = call(
        &h.app,
        Method::POST,
        "/notifications",
        Some(json!({"type": "critical", "title": "t", "message": "m"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_clear_notifications() {
    let h = harness(FakeBackend::default());
    for title in ["a", "b"] {
        call(
            &h.app,
            Method::POST,
            "/notifications",
            Some(json!({"type": "info", "title": title, "message": "m"})),
        )
        .await;
    }
    let (status, _) = call(&h.app, Method::DELETE, "/notifications", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_activity_feed_with_filters() {
    let h = harness(FakeBackend::default());
    h.feeds.set_deployments(vec![record(3, "web", "active", "2025-03-01T12:00:00Z")]);
    h.feeds.degrade_syncs();

    let (status, body) = call(&h.app, Method::GET, "/activity?provider=all&source=nonsense", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["events"][0]["id"], "deployment:3:2025-03-01T12:00:00Z");
    assert_eq!(body["events"][0]["status"], "success");
    assert_eq!(body["degraded"], json!(["syncs"]));

    h.feeds.set_syncs(vec![sync_summary("bucket", "gcp", "2025-03-01T13:00:00Z")]);
    let (_, body) = call(&h.app, Method::GET, "/activity?provider=gcp", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["events"][0]["source"], "sync");
    assert_eq!(body["degraded"], json!([]));

    let (_, body) = call(&h.app, Method::GET, "/activity?q=nothing-matches", None).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_session_login_and_logout() {
    let h = harness(FakeBackend::default());

    let (_, body) = call(&h.app, Method::GET, "/session", None).await;
    assert_eq!(body, json!({"authenticated": false, "loading": false, "epoch": 0}));

    let (status, body) = call(&h.app, Method::PUT, "/session", Some(json!({"token": "abc"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["epoch"], 1);

    h.feeds.set_deployments(vec![record(3, "web", "active", "2025-03-01T12:00:00Z")]);
    let (_, body) = call(&h.app, Method::DELETE, "/session", None).await;
    assert_eq!(body["authenticated"], false);
    assert_eq!(body["epoch"], 2);
    assert!(h.feeds.deployments().is_empty());

    let (status, _) = call(&h.app, Method::PUT, "/session", Some(json!({"token": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sync_trigger() {
    let backend = FakeBackend::default();
    *backend.sync_message.lock().unwrap() = Some("Sync started".to_string());
    let h = harness(backend);

    let (_, body) = call(&h.app, Method::POST, "/sync", None).await;
    assert_eq!(body["success"], false);

    call(&h.app, Method::PUT, "/session", Some(json!({"token": "abc"}))).await;
    assert!(h.session.state().authenticated);

    let (_, body) = call(&h.app, Method::POST, "/sync", None).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Sync started");
    assert_eq!(h.store.notifications().await[0].title, "Sync Triggered");
}
