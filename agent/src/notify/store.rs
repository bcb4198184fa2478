//! Notification store
//!
//! An ordered, capacity-bounded list of notifications, newest first. Every
//! mutation rewrites the full list to durable storage. The in-memory list is
//! authoritative: a failed write is logged and otherwise ignored.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::errors::AgentError;
use crate::models::notification::{AppNotification, NotificationInput};

/// Default number of notifications kept
pub const DEFAULT_CAPACITY: usize = 50;

/// Durable backing record of the store
#[async_trait]
pub trait NotificationPersistence: Send + Sync {
    /// Read the serialized list, `None` if nothing was ever written
    async fn load(&self) -> Result<Option<String>, AgentError>;

    /// Replace the serialized list
    async fn save(&self, blob: &str) -> Result<(), AgentError>;
}

struct Inner {
    items: Vec<AppNotification>,
    unread: usize,
}

impl Inner {
    fn new(items: Vec<AppNotification>) -> Self {
        let mut inner = Self { items, unread: 0 };
        inner.recount();
        inner
    }

    fn recount(&mut self) {
        self.unread = self.items.iter().filter(|n| !n.read).count();
    }
}

/// Result of decoding a persisted blob
#[derive(Debug, Default)]
pub struct Rehydrated {
    pub notifications: Vec<AppNotification>,
    /// Entries that failed structural validation or exceeded capacity
    pub dropped: usize,
}

/// Decode a persisted list. Invalid entries are dropped one by one; a blob
/// that is not a JSON array yields an empty list.
pub fn rehydrate(blob: &str, capacity: usize) -> Rehydrated {
    let values = match serde_json::from_str::<serde_json::Value>(blob) {
        Ok(serde_json::Value::Array(values)) => values,
        Ok(_) => {
            warn!("Persisted notifications are not a list, starting empty");
            return Rehydrated::default();
        }
        Err(e) => {
            warn!("Persisted notifications are corrupt, starting empty: {}", e);
            return Rehydrated::default();
        }
    };

    let total = values.len();
    let mut notifications: Vec<AppNotification> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<AppNotification>(value).ok())
        .filter(AppNotification::is_well_formed)
        .collect();
    notifications.truncate(capacity);

    Rehydrated {
        dropped: total - notifications.len(),
        notifications,
    }
}

/// Bounded, persisted notification store
pub struct NotificationStore {
    inner: RwLock<Inner>,
    capacity: usize,
    persistence: Arc<dyn NotificationPersistence>,
}

impl NotificationStore {
    /// Create an empty store without reading persisted state
    pub fn new(persistence: Arc<dyn NotificationPersistence>, capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::new(Vec::new())),
            capacity: capacity.max(1),
            persistence,
        }
    }

    /// Create a store rehydrated from its persisted record. Never fails: an
    /// unreadable record yields an empty store.
    pub async fn load(persistence: Arc<dyn NotificationPersistence>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let rehydrated = match persistence.load().await {
            Ok(Some(blob)) => rehydrate(&blob, capacity),
            Ok(None) => Rehydrated::default(),
            Err(e) => {
                warn!("Unable to read persisted notifications, starting empty: {}", e);
                Rehydrated::default()
            }
        };

        if rehydrated.dropped > 0 {
            warn!("Dropped {} invalid persisted notifications", rehydrated.dropped);
        }
        info!("Loaded {} notifications", rehydrated.notifications.len());

        Self {
            inner: RwLock::new(Inner::new(rehydrated.notifications)),
            capacity,
            persistence,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All notifications, newest first
    pub async fn notifications(&self) -> Vec<AppNotification> {
        self.inner.read().await.items.clone()
    }

    pub async fn unread_count(&self) -> usize {
        self.inner.read().await.unread
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Insert a notification at the head, evicting the oldest beyond capacity
    pub async fn add(&self, input: NotificationInput) -> AppNotification {
        self.add_at(input, Utc::now()).await
    }

    /// [`add`](Self::add) with an explicit creation time
    pub async fn add_at(&self, input: NotificationInput, now: DateTime<Utc>) -> AppNotification {
        let notification = AppNotification::from_input(input, now);
        debug!(
            "Adding notification {} ({}): {}",
            notification.id,
            notification.kind.as_str(),
            notification.title
        );

        let mut inner = self.inner.write().await;
        inner.items.insert(0, notification.clone());
        inner.items.truncate(self.capacity);
        inner.recount();
        self.persist(&inner.items).await;

        notification
    }

    /// Mark every notification read. Returns false (and writes nothing) when
    /// there was nothing unread.
    pub async fn mark_all_read(&self) -> bool {
        let mut inner = self.inner.write().await;
        if inner.unread == 0 {
            return false;
        }
        inner.items.iter_mut().for_each(|n| n.read = true);
        inner.recount();
        self.persist(&inner.items).await;
        true
    }

    /// Remove one notification. Returns false when the id is unknown.
    pub async fn remove(&self, id: &str) -> bool {
        let mut inner = self.inner.write().await;
        let Some(index) = inner.items.iter().position(|n| n.id == id) else {
            return false;
        };
        inner.items.remove(index);
        inner.recount();
        self.persist(&inner.items).await;
        true
    }

    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.items.clear();
        inner.recount();
        self.persist(&inner.items).await;
    }

    async fn persist(&self, items: &[AppNotification]) {
        let blob = match serde_json::to_string(items) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Unable to serialize notifications: {}", e);
                return;
            }
        };
        if let Err(e) = self.persistence.save(&blob).await {
            warn!("Unable to persist notifications: {}", e);
        }
    }
}

/// In-memory persistence, useful when durable storage is unavailable
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    blob: std::sync::Mutex<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: std::sync::Mutex::new(Some(blob.into())),
        }
    }

    /// The last written blob
    pub fn blob(&self) -> Option<String> {
        self.blob.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl NotificationPersistence for MemoryPersistence {
    async fn load(&self) -> Result<Option<String>, AgentError> {
        Ok(self.blob())
    }

    async fn save(&self, blob: &str) -> Result<(), AgentError> {
        *self.blob.lock().unwrap_or_else(|e| e.into_inner()) = Some(blob.to_string());
        Ok(())
    }
}
