//! Deployment API client

use secrecy::SecretString;

use crate::errors::AgentError;
use crate::http::client::HttpClient;
use crate::models::deployment::{DeploymentRecord, DeploymentSnapshot};

const DEPLOYMENTS_PATH: &str = "/deployments/";

impl HttpClient {
    /// Current status of every deployment of the user
    pub async fn list_deployment_snapshots(
        &self,
        token: &SecretString,
    ) -> Result<Vec<DeploymentSnapshot>, AgentError> {
        let payload: serde_json::Value = self.get(DEPLOYMENTS_PATH, token).await?;
        Ok(DeploymentSnapshot::list_from_payload(payload))
    }

    /// Deployment-creation records for the activity feed
    pub async fn list_deployment_records(
        &self,
        token: &SecretString,
    ) -> Result<Vec<DeploymentRecord>, AgentError> {
        let payload: serde_json::Value = self.get(DEPLOYMENTS_PATH, token).await?;
        Ok(DeploymentRecord::list_from_payload(payload))
    }
}
