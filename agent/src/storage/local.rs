//! String-keyed durable local storage
//!
//! Each key maps to one file under the state directory. Keys are the only
//! versioning mechanism: a format change means a new key.

use async_trait::async_trait;

use crate::errors::AgentError;
use crate::filesys::dir::Dir;
use crate::filesys::file::File;
use crate::notify::store::NotificationPersistence;

/// Key under which the notification list is persisted
pub const NOTIFICATIONS_KEY: &str = "app_notifications";

/// Durable string-keyed records
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: Dir,
}

impl LocalStorage {
    pub fn new(dir: Dir) -> Self {
        Self { dir }
    }

    fn record(&self, key: &str) -> Result<File, AgentError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(AgentError::StorageError(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.file(&format!("{}.json", key)))
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, AgentError> {
        self.record(key)?.read_optional().await
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), AgentError> {
        self.record(key)?.write_atomic(value.as_bytes()).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), AgentError> {
        self.record(key)?.delete().await
    }

    /// Bind one key for use as the notification store's backing record
    pub fn keyed(&self, key: &str) -> KeyedRecord {
        KeyedRecord {
            storage: self.clone(),
            key: key.to_string(),
        }
    }
}

/// A single key of [`LocalStorage`]
#[derive(Debug, Clone)]
pub struct KeyedRecord {
    storage: LocalStorage,
    key: String,
}

#[async_trait]
impl NotificationPersistence for KeyedRecord {
    async fn load(&self) -> Result<Option<String>, AgentError> {
        self.storage.get(&self.key).await
    }

    async fn save(&self, blob: &str) -> Result<(), AgentError> {
        self.storage.set(&self.key, blob).await
    }
}
