//! Settings file management

use serde::{Deserialize, Serialize};

use crate::errors::AgentError;
use crate::logs::LogLevel;

/// Agent settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON log lines on stdout
    #[serde(default)]
    pub log_json: bool,

    /// Also write daily-rolling log files under the data directory
    #[serde(default)]
    pub log_to_file: bool,

    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub polling: PollingSettings,

    #[serde(default)]
    pub server: ServerSettings,

    /// Maximum number of notifications kept
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
}

fn default_true() -> bool {
    true
}

fn default_notification_capacity() -> usize {
    50
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            log_to_file: false,
            backend: BackendSettings::default(),
            auth: AuthSettings::default(),
            polling: PollingSettings::default(),
            server: ServerSettings::default(),
            notification_capacity: default_notification_capacity(),
        }
    }
}

impl Settings {
    /// Reject settings the agent cannot run with
    pub fn validate(&self) -> Result<(), AgentError> {
        let url = url::Url::parse(&self.backend.base_url).map_err(|e| {
            AgentError::ConfigError(format!("Invalid backend URL {}: {}", self.backend.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AgentError::ConfigError(format!(
                "Unsupported backend URL scheme: {}",
                url.scheme()
            )));
        }
        if self.notification_capacity == 0 {
            return Err(AgentError::ConfigError(
                "notification_capacity must be positive".to_string(),
            ));
        }
        let polling = &self.polling;
        if polling.snapshot_secs == 0 || polling.deployments_secs == 0 || polling.sync_secs == 0 {
            return Err(AgentError::ConfigError(
                "polling intervals must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Bearer token to log in with at startup
    #[serde(default)]
    pub token: Option<String>,
}

/// Poll intervals in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSettings {
    #[serde(default = "default_snapshot_secs")]
    pub snapshot_secs: u64,

    #[serde(default = "default_deployments_secs")]
    pub deployments_secs: u64,

    #[serde(default = "default_sync_secs")]
    pub sync_secs: u64,

    #[serde(default)]
    pub initial_delay_secs: u64,

    /// How often the session is checked for token expiry
    #[serde(default = "default_session_check_secs")]
    pub session_check_secs: u64,
}

fn default_snapshot_secs() -> u64 {
    7
}

fn default_deployments_secs() -> u64 {
    7
}

fn default_sync_secs() -> u64 {
    15
}

fn default_session_check_secs() -> u64 {
    60
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            snapshot_secs: default_snapshot_secs(),
            deployments_secs: default_deployments_secs(),
            sync_secs: default_sync_secs(),
            initial_delay_secs: 0,
            session_check_secs: default_session_check_secs(),
        }
    }
}

/// Local API server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8787
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}
