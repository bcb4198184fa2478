//! Backend synchronization: the diff engine and the poll targets feeding it

pub mod diff;
pub mod sources;
pub mod trigger;
pub mod watcher;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::errors::AgentError;
use crate::http::client::HttpClient;
use crate::models::deployment::{DeploymentRecord, DeploymentSnapshot, SyncSummary};

/// The backend reads and actions the engine depends on
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn deployment_snapshots(&self, token: &SecretString) -> Result<Vec<DeploymentSnapshot>, AgentError>;

    async fn deployment_records(&self, token: &SecretString) -> Result<Vec<DeploymentRecord>, AgentError>;

    async fn sync_summaries(&self, token: &SecretString) -> Result<Vec<SyncSummary>, AgentError>;

    /// Trigger an inventory sync, returning the backend's message
    async fn trigger_sync(&self, token: &SecretString) -> Result<String, AgentError>;
}

#[async_trait]
impl BackendApi for HttpClient {
    async fn deployment_snapshots(&self, token: &SecretString) -> Result<Vec<DeploymentSnapshot>, AgentError> {
        self.list_deployment_snapshots(token).await
    }

    async fn deployment_records(&self, token: &SecretString) -> Result<Vec<DeploymentRecord>, AgentError> {
        self.list_deployment_records(token).await
    }

    async fn sync_summaries(&self, token: &SecretString) -> Result<Vec<SyncSummary>, AgentError> {
        self.recent_sync_summaries(token).await
    }

    async fn trigger_sync(&self, token: &SecretString) -> Result<String, AgentError> {
        let response = self.trigger_inventory_sync(token).await?;
        Ok(response.message)
    }
}

/// What a single poll did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Polling is gated off (unauthenticated or loading)
    Skipped,
    /// The session changed while the request was in flight
    Stale,
    /// The response was applied
    Applied { emitted: usize },
    /// The fetch failed and the source was degraded to empty
    Degraded,
}
