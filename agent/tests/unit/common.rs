//! Shared fixtures

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;

use cloudpulse::authn::session::{AcceptAll, Session};
use cloudpulse::authn::session_token::SessionToken;
use cloudpulse::errors::AgentError;
use cloudpulse::models::deployment::{DeploymentRecord, DeploymentSnapshot, SyncSummary};
use cloudpulse::notify::store::NotificationPersistence;
use cloudpulse::sync::BackendApi;

pub fn snapshot(id: u64, name: &str, status: &str) -> DeploymentSnapshot {
    DeploymentSnapshot {
        id,
        resource_name: name.to_string(),
        status: status.to_string(),
        provider: "aws".to_string(),
    }
}

pub fn record(id: u64, name: &str, status: &str, started_at: &str) -> DeploymentRecord {
    DeploymentRecord {
        id,
        resource_name: name.to_string(),
        provider: "aws".to_string(),
        resource_type: "vm".to_string(),
        status: status.to_string(),
        started_at: started_at.to_string(),
        completed_at: None,
        duration_seconds: None,
    }
}

pub fn sync_summary(name: &str, provider: &str, last_synced_at: &str) -> SyncSummary {
    SyncSummary {
        resource_name: name.to_string(),
        provider: provider.to_string(),
        resource_type: "bucket".to_string(),
        status: "active".to_string(),
        region: Some("us-east-1".to_string()),
        last_synced_at: Some(last_synced_at.to_string()),
    }
}

pub async fn logged_in_session() -> Arc<Session> {
    let session = Arc::new(Session::new());
    let token = SessionToken::from_raw("opaque-test-token").unwrap();
    session.login(token, &AcceptAll).await.unwrap();
    session
}

/// Persistence that always fails to write
#[derive(Default)]
pub struct BrokenPersistence {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl NotificationPersistence for BrokenPersistence {
    async fn load(&self) -> Result<Option<String>, AgentError> {
        Err(AgentError::StorageError("disk unavailable".to_string()))
    }

    async fn save(&self, _blob: &str) -> Result<(), AgentError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AgentError::StorageError("quota exceeded".to_string()))
    }
}

/// Scriptable backend. Snapshot responses are served in order, the last one
/// repeating; an optional hook runs before each snapshot response is returned.
#[derive(Default)]
pub struct FakeBackend {
    pub snapshots: Mutex<Vec<Result<Vec<DeploymentSnapshot>, u16>>>,
    pub records: Mutex<Option<Vec<DeploymentRecord>>>,
    pub syncs: Mutex<Option<Vec<SyncSummary>>>,
    pub sync_message: Mutex<Option<String>>,
    pub before_snapshot: Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
    pub snapshot_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn with_snapshots(responses: Vec<Vec<DeploymentSnapshot>>) -> Self {
        let backend = Self::default();
        *backend.snapshots.lock().unwrap() = responses.into_iter().map(Ok).collect();
        backend
    }

    pub fn push_snapshot(&self, response: Result<Vec<DeploymentSnapshot>, u16>) {
        self.snapshots.lock().unwrap().push(response);
    }
}

fn backend_error(status: u16) -> AgentError {
    AgentError::BackendError {
        status,
        body: "error".to_string(),
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn deployment_snapshots(
        &self,
        _token: &SecretString,
    ) -> Result<Vec<DeploymentSnapshot>, AgentError> {
        self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.before_snapshot.lock().unwrap().as_ref() {
            hook();
        }
        let mut responses = self.snapshots.lock().unwrap();
        let response = if responses.len() > 1 {
            responses.remove(0)
        } else {
            responses.first().cloned().unwrap_or(Ok(Vec::new()))
        };
        response.map_err(backend_error)
    }

    async fn deployment_records(
        &self,
        _token: &SecretString,
    ) -> Result<Vec<DeploymentRecord>, AgentError> {
        self.records.lock().unwrap().clone().ok_or_else(|| backend_error(500))
    }

    async fn sync_summaries(&self, _token: &SecretString) -> Result<Vec<SyncSummary>, AgentError> {
        self.syncs.lock().unwrap().clone().ok_or_else(|| backend_error(503))
    }

    async fn trigger_sync(&self, _token: &SecretString) -> Result<String, AgentError> {
        self.sync_message.lock().unwrap().clone().ok_or_else(|| backend_error(502))
    }
}
