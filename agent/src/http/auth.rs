//! Auth API client

use async_trait::async_trait;
use openapi_client::models::UserProfile;
use secrecy::SecretString;
use tracing::debug;

use crate::authn::session::SessionValidator;
use crate::errors::AgentError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// Profile of the token's owner
    pub async fn current_user(&self, token: &SecretString) -> Result<UserProfile, AgentError> {
        self.get("/auth/me", token).await
    }
}

#[async_trait]
impl SessionValidator for HttpClient {
    async fn validate(&self, token: &SecretString) -> Result<(), AgentError> {
        let user = self.current_user(token).await?;
        if user.is_active == Some(false) {
            return Err(AgentError::AuthError(format!("User {} is inactive", user.email)));
        }
        debug!("Session belongs to user {}", user.id);
        Ok(())
    }
}
