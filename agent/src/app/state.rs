//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::app::options::AppOptions;
use crate::authn::session::Session;
use crate::cache::feeds::FeedCache;
use crate::errors::AgentError;
use crate::http::client::HttpClient;
use crate::notify::store::NotificationStore;
use crate::storage::local::{LocalStorage, NOTIFICATIONS_KEY};
use crate::sync::sources::{FeedKind, FeedPoller};
use crate::sync::watcher::DeploymentWatcher;
use crate::sync::BackendApi;

/// Main application state
pub struct AppState {
    /// HTTP client for backend communication
    pub http_client: Arc<HttpClient>,

    /// Authentication signal and fetch epoch
    pub session: Arc<Session>,

    /// Persisted notifications
    pub store: Arc<NotificationStore>,

    /// Latest deployment-creation records and sync summaries
    pub feeds: Arc<FeedCache>,

    /// Snapshot poll target driving the diff engine
    pub watcher: Arc<DeploymentWatcher>,

    pub deployment_feed: Arc<FeedPoller>,

    pub sync_feed: Arc<FeedPoller>,
}

impl AppState {
    /// Initialize application state
    pub async fn init(options: &AppOptions) -> Result<Self, AgentError> {
        info!("Initializing application state...");

        options.layout.setup().await?;

        let http_client = Arc::new(HttpClient::new(
            &options.backend_base_url,
            options.request_timeout,
        )?);
        let backend: Arc<dyn BackendApi> = http_client.clone();

        let session = Arc::new(Session::new());

        // Rehydrate notifications
        let storage = LocalStorage::new(options.layout.state_dir());
        let persistence = Arc::new(storage.keyed(NOTIFICATIONS_KEY));
        let store = Arc::new(NotificationStore::load(persistence, options.notification_capacity).await);

        let feeds = Arc::new(FeedCache::new());

        let watcher = Arc::new(DeploymentWatcher::new(
            backend.clone(),
            session.clone(),
            store.clone(),
        ));
        let deployment_feed = Arc::new(FeedPoller::new(
            FeedKind::Deployments,
            backend.clone(),
            session.clone(),
            feeds.clone(),
        ));
        let sync_feed = Arc::new(FeedPoller::new(
            FeedKind::Syncs,
            backend,
            session.clone(),
            feeds.clone(),
        ));

        Ok(Self {
            http_client,
            session,
            store,
            feeds,
            watcher,
            deployment_feed,
            sync_feed,
        })
    }
}
