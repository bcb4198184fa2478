//! Deployment status watcher
//!
//! Poll target feeding the snapshot source through the diff engine into the
//! notification store. The engine lock is held from the epoch check until
//! every notification is stored, so two polls never interleave their diffs.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::authn::session::Session;
use crate::errors::AgentError;
use crate::notify::store::NotificationStore;
use crate::sync::diff::DiffEngine;
use crate::sync::{BackendApi, PollOutcome};
use crate::workers::poller::PollTarget;

pub struct DeploymentWatcher {
    backend: Arc<dyn BackendApi>,
    session: Arc<Session>,
    store: Arc<NotificationStore>,
    engine: Mutex<DiffEngine>,
}

impl DeploymentWatcher {
    pub fn new(backend: Arc<dyn BackendApi>, session: Arc<Session>, store: Arc<NotificationStore>) -> Self {
        Self {
            backend,
            session,
            store,
            engine: Mutex::new(DiffEngine::new()),
        }
    }

    /// Whether the current session has been hydrated
    pub async fn is_hydrated(&self) -> bool {
        self.engine.lock().await.is_hydrated()
    }

    pub async fn poll_once(&self) -> Result<PollOutcome, AgentError> {
        let Some(ticket) = self.session.ticket() else {
            let mut engine = self.engine.lock().await;
            if engine.is_hydrated() {
                debug!("Session inactive, discarding tracked deployment statuses");
                engine.reset();
            }
            return Ok(PollOutcome::Skipped);
        };

        let snapshots = match self.backend.deployment_snapshots(&ticket.token).await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                if e.is_unauthorized() && self.session.is_current(&ticket) {
                    warn!("Backend rejected the session token, logging out");
                    self.session.logout();
                }
                return Err(e);
            }
        };

        let mut engine = self.engine.lock().await;
        if !self.session.is_current(&ticket) {
            debug!("Discarding snapshot fetched under epoch {}", ticket.epoch);
            return Ok(PollOutcome::Stale);
        }

        let hydrating = engine.epoch() != Some(ticket.epoch) || !engine.is_hydrated();
        let inputs = engine.observe_in(ticket.epoch, &snapshots);
        if hydrating {
            info!("Hydrated with {} deployments", engine.tracked());
        }

        let emitted = inputs.len();
        for input in inputs {
            self.store.add(input).await;
        }
        if emitted > 0 {
            debug!("Emitted {} deployment notifications", emitted);
        }

        Ok(PollOutcome::Applied { emitted })
    }
}

#[async_trait]
impl PollTarget for DeploymentWatcher {
    fn name(&self) -> &'static str {
        "deployment-watcher"
    }

    async fn poll(&self) -> Result<(), AgentError> {
        self.poll_once().await.map(|_| ())
    }
}
