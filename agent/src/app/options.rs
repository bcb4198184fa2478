//! Application configuration options

use std::time::Duration;

use crate::notify::store::DEFAULT_CAPACITY;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;
use crate::workers::{poller, session_watch};

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Backend API base URL
    pub backend_base_url: String,

    /// Backend request timeout
    pub request_timeout: Duration,

    /// Bearer token to log in with at startup
    pub token: Option<String>,

    /// Storage layout paths
    pub layout: StorageLayout,

    /// Maximum number of notifications kept
    pub notification_capacity: usize,

    /// Enable local HTTP server
    pub enable_server: bool,

    /// Server configuration
    pub server: ServerOptions,

    /// Deployment snapshot poller (feeds the diff engine)
    pub snapshot_poller: poller::Options,

    /// Deployment-creation records poller
    pub deployments_poller: poller::Options,

    /// Sync summaries poller
    pub syncs_poller: poller::Options,

    /// Session expiry worker options
    pub session_watch: session_watch::Options,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            lifecycle: LifecycleOptions::default(),
            backend_base_url: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_secs(30),
            token: None,
            layout: StorageLayout::default(),
            notification_capacity: DEFAULT_CAPACITY,
            enable_server: true,
            server: ServerOptions::default(),
            snapshot_poller: poller::Options::every(Duration::from_secs(7)),
            deployments_poller: poller::Options::every(Duration::from_secs(7)),
            syncs_poller: poller::Options::every(Duration::from_secs(15)),
            session_watch: session_watch::Options::default(),
        }
    }
}

impl AppOptions {
    /// Derive the run options from loaded settings
    pub fn from_settings(settings: &Settings, layout: StorageLayout) -> Self {
        let polling = &settings.polling;
        let initial_delay = Duration::from_secs(polling.initial_delay_secs);
        let poller_options = |secs: u64| poller::Options {
            interval: Duration::from_secs(secs),
            initial_delay,
        };

        Self {
            backend_base_url: settings.backend.base_url.clone(),
            request_timeout: Duration::from_secs(settings.backend.request_timeout_secs),
            token: settings.auth.token.clone(),
            layout,
            notification_capacity: settings.notification_capacity,
            enable_server: settings.server.enabled,
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
            snapshot_poller: poller_options(polling.snapshot_secs),
            deployments_poller: poller_options(polling.deployments_secs),
            syncs_poller: poller_options(polling.sync_secs),
            session_watch: session_watch::Options {
                check_interval: Duration::from_secs(polling.session_check_secs.max(1)),
            },
            ..Default::default()
        }
    }
}

/// Lifecycle options for the agent
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}
