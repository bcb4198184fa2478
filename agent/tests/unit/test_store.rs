//! Notification store tests

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use cloudpulse::filesys::dir::Dir;
use cloudpulse::models::notification::{
    AppNotification, NotificationInput, NotificationSource, NotificationType,
};
use cloudpulse::notify::store::{MemoryPersistence, NotificationStore, DEFAULT_CAPACITY};
use cloudpulse::storage::local::{LocalStorage, NOTIFICATIONS_KEY};

use crate::common::BrokenPersistence;

fn input(title: &str) -> NotificationInput {
    NotificationInput::new(
        NotificationType::Info,
        title,
        format!("{} happened", title),
        NotificationSource::System,
    )
}

#[tokio::test]
async fn test_capacity_evicts_oldest() {
    let store = NotificationStore::new(Arc::new(MemoryPersistence::new()), DEFAULT_CAPACITY);
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    for i in 0..55 {
        store
            .add_at(input(&format!("n{}", i)), start + Duration::seconds(i))
            .await;
    }

    let items = store.notifications().await;
    assert_eq!(items.len(), 50);
    assert_eq!(items[0].title, "n54");
    assert_eq!(items[49].title, "n5");
    assert!(items.iter().all(|n| n.title != "n4"));
    assert_eq!(store.unread_count().await, 50);
}

#[tokio::test]
async fn test_persisted_list_round_trips() {
    let persistence = Arc::new(MemoryPersistence::new());
    let store = NotificationStore::new(persistence.clone(), DEFAULT_CAPACITY);
    store.add(input("first")).await;
    store.add(input("second")).await;
    store.mark_all_read().await;
    store.add(input("third")).await;

    let reloaded = NotificationStore::load(persistence.clone(), DEFAULT_CAPACITY).await;
    assert_eq!(reloaded.notifications().await, store.notifications().await);
    assert_eq!(reloaded.unread_count().await, 1);
}

#[tokio::test]
async fn test_invalid_persisted_entries_are_dropped() {
    let good = json!({
        "id": "7-1700000000000-abc123",
        "type": "success",
        "title": "Deployment Active",
        "message": "web on AWS: active",
        "createdAt": "2023-11-14T22:13:20.000Z",
        "read": true,
        "deploymentId": 7,
        "source": "deployment"
    });
    let blob = json!([
        good,
        {"id": "x", "type": "bogus", "title": "t", "message": "m", "createdAt": "", "source": "system"},
        {"id": "", "type": "info", "title": "t", "message": "m", "createdAt": "", "source": "system"},
        {"title": "missing id"},
        42
    ]);

    let persistence = Arc::new(MemoryPersistence::with_blob(blob.to_string()));
    let store = NotificationStore::load(persistence, DEFAULT_CAPACITY).await;

    let items = store.notifications().await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].deployment_id, Some(7));
    assert!(items[0].read);
    assert_eq!(store.unread_count().await, 0);
}

#[tokio::test]
async fn test_oversized_persisted_list_is_truncated() {
    let items: Vec<AppNotification> = (0..60)
        .map(|i| AppNotification::from_input(input(&format!("n{}", i)), Utc::now()))
        .collect();
    let blob = serde_json::to_string(&items).unwrap();

    let store = NotificationStore::load(Arc::new(MemoryPersistence::with_blob(blob)), 50).await;
    assert_eq!(store.len().await, 50);
    assert_eq!(store.notifications().await[0].title, "n0");
}

#[tokio::test]
async fn test_corrupt_blob_yields_empty_store() {
    let store =
        NotificationStore::load(Arc::new(MemoryPersistence::with_blob("{not json")), 50).await;
    assert!(store.is_empty().await);
    assert_eq!(store.unread_count().await, 0);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let persistence = Arc::new(MemoryPersistence::new());
    let store = NotificationStore::new(persistence.clone(), DEFAULT_CAPACITY);
    let first = store.add(input("first")).await;
    store.add(input("second")).await;

    assert!(store.remove(&first.id).await);
    assert!(!store.remove(&first.id).await);
    assert_eq!(store.len().await, 1);
    assert_eq!(store.unread_count().await, 1);

    store.clear().await;
    assert!(store.is_empty().await);
    assert_eq!(store.unread_count().await, 0);
    assert_eq!(persistence.blob().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_write_failures_keep_memory_authoritative() {
    let persistence = Arc::new(BrokenPersistence::default());
    let store = NotificationStore::load(persistence.clone(), DEFAULT_CAPACITY).await;
    assert!(store.is_empty().await);

    let added = store.add(input("still here")).await;
    assert_eq!(store.notifications().await, vec![added]);
    assert_eq!(store.unread_count().await, 1);
    assert!(store.mark_all_read().await);
    assert_eq!(store.unread_count().await, 0);
    assert_eq!(persistence.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_local_storage_backs_the_store() {
    let dir = Dir::create_temp_dir("cloudpulse-store").await.unwrap();
    let storage = LocalStorage::new(dir.clone());

    let store = NotificationStore::load(Arc::new(storage.keyed(NOTIFICATIONS_KEY)), 50).await;
    store.add(input("persisted")).await;

    let raw = storage.get(NOTIFICATIONS_KEY).await.unwrap().unwrap();
    assert!(raw.contains("\"persisted\""));

    let reloaded = NotificationStore::load(Arc::new(storage.keyed(NOTIFICATIONS_KEY)), 50).await;
    assert_eq!(reloaded.notifications().await[0].title, "persisted");

    dir.delete().await.unwrap();
}
