//! Latest polled activity inputs, one slot per source
//!
//! Each source is replaced wholesale by its own poller; there is no
//! cross-source atomicity. Readers merge whatever is cached at the time.

use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::models::deployment::{DeploymentRecord, SyncSummary};

/// One cached source list
#[derive(Debug, Clone)]
pub struct FeedEntry<T> {
    pub items: Vec<T>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether the last poll of this source failed
    pub degraded: bool,
}

impl<T> Default for FeedEntry<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            updated_at: None,
            degraded: false,
        }
    }
}

/// Cached deployment-creation records and sync summaries
#[derive(Default)]
pub struct FeedCache {
    deployments: RwLock<FeedEntry<DeploymentRecord>>,
    syncs: RwLock<FeedEntry<SyncSummary>>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deployments(&self) -> Vec<DeploymentRecord> {
        let entry = self.deployments.read().unwrap_or_else(|e| e.into_inner());
        entry.items.clone()
    }

    pub fn syncs(&self) -> Vec<SyncSummary> {
        let entry = self.syncs.read().unwrap_or_else(|e| e.into_inner());
        entry.items.clone()
    }

    pub fn set_deployments(&self, items: Vec<DeploymentRecord>) {
        let mut entry = self.deployments.write().unwrap_or_else(|e| e.into_inner());
        *entry = FeedEntry {
            items,
            updated_at: Some(Utc::now()),
            degraded: false,
        };
    }

    pub fn set_syncs(&self, items: Vec<SyncSummary>) {
        let mut entry = self.syncs.write().unwrap_or_else(|e| e.into_inner());
        *entry = FeedEntry {
            items,
            updated_at: Some(Utc::now()),
            degraded: false,
        };
    }

    /// A failed fetch degrades the source to an empty list
    pub fn degrade_deployments(&self) {
        let mut entry = self.deployments.write().unwrap_or_else(|e| e.into_inner());
        entry.items.clear();
        entry.degraded = true;
    }

    pub fn degrade_syncs(&self) {
        let mut entry = self.syncs.write().unwrap_or_else(|e| e.into_inner());
        entry.items.clear();
        entry.degraded = true;
    }

    pub fn is_degraded(&self) -> (bool, bool) {
        let deployments = self.deployments.read().unwrap_or_else(|e| e.into_inner());
        let syncs = self.syncs.read().unwrap_or_else(|e| e.into_inner());
        (deployments.degraded, syncs.degraded)
    }

    /// Forget both sources, e.g. when the session ends
    pub fn clear(&self) {
        *self.deployments.write().unwrap_or_else(|e| e.into_inner()) = FeedEntry::default();
        *self.syncs.write().unwrap_or_else(|e| e.into_inner()) = FeedEntry::default();
    }
}
