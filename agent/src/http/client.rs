//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::errors::AgentError;

/// HTTP client for backend communication
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cloudpulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(request: RequestBuilder, token: Option<&SecretString>) -> RequestBuilder {
        match token {
            Some(token) => request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, method: &str, request: RequestBuilder) -> Result<T, AgentError> {
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} failed: {} - {}", method, status, body);
            return Err(AgentError::BackendError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.json().await?;
        Ok(body)
    }

    /// Make an authorized GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: &SecretString) -> Result<T, AgentError> {
        let url = self.url(path);
        debug!("GET {}", url);
        let request = Self::authorized(self.client.get(&url), Some(token));
        self.send("GET", request).await
    }

    /// Make an authorized POST request without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str, token: &SecretString) -> Result<T, AgentError> {
        let url = self.url(path);
        debug!("POST {}", url);
        let request = Self::authorized(self.client.post(&url), Some(token));
        self.send("POST", request).await
    }

    /// Make an unauthenticated GET request
    pub async fn get_public<T: DeserializeOwned>(&self, path: &str) -> Result<T, AgentError> {
        let url = self.url(path);
        debug!("GET {}", url);
        self.send("GET", self.client.get(&url)).await
    }
}
