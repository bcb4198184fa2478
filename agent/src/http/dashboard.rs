//! Dashboard API client

use openapi_client::models::{BackendHealth, SyncTriggerResponse};
use secrecy::SecretString;

use crate::errors::AgentError;
use crate::http::client::HttpClient;
use crate::models::deployment::SyncSummary;

impl HttpClient {
    /// Most recently synced inventory resources. Reads `recent_activity` of
    /// the stats payload; a bare list or `{items}` body is accepted as well.
    pub async fn recent_sync_summaries(&self, token: &SecretString) -> Result<Vec<SyncSummary>, AgentError> {
        let payload: serde_json::Value = self.get("/dashboard/stats", token).await?;
        let list = match payload {
            serde_json::Value::Object(mut stats) if stats.contains_key("recent_activity") => {
                stats.remove("recent_activity").unwrap_or_default()
            }
            other => other,
        };
        Ok(SyncSummary::list_from_payload(list))
    }

    /// Ask the backend to resync the user's cloud inventory
    pub async fn trigger_inventory_sync(&self, token: &SecretString) -> Result<SyncTriggerResponse, AgentError> {
        self.post_empty("/dashboard/sync/trigger", token).await
    }

    pub async fn health(&self) -> Result<BackendHealth, AgentError> {
        self.get_public("/health").await
    }
}
