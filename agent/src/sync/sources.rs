//! Poll targets for the two ephemeral activity sources
//!
//! A failed fetch degrades its source to an empty list without touching the
//! other; the next tick retries.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::authn::session::Session;
use crate::cache::feeds::FeedCache;
use crate::errors::AgentError;
use crate::sync::{BackendApi, PollOutcome};
use crate::workers::poller::PollTarget;

/// Which activity source a [`FeedPoller`] refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Deployments,
    Syncs,
}

pub struct FeedPoller {
    kind: FeedKind,
    backend: Arc<dyn BackendApi>,
    session: Arc<Session>,
    cache: Arc<FeedCache>,
}

impl FeedPoller {
    pub fn new(
        kind: FeedKind,
        backend: Arc<dyn BackendApi>,
        session: Arc<Session>,
        cache: Arc<FeedCache>,
    ) -> Self {
        Self {
            kind,
            backend,
            session,
            cache,
        }
    }

    pub async fn poll_once(&self) -> PollOutcome {
        let Some(ticket) = self.session.ticket() else {
            self.clear();
            return PollOutcome::Skipped;
        };

        let result = match self.kind {
            FeedKind::Deployments => self
                .backend
                .deployment_records(&ticket.token)
                .await
                .map(|records| (records.len(), Fetched::Deployments(records))),
            FeedKind::Syncs => self
                .backend
                .sync_summaries(&ticket.token)
                .await
                .map(|summaries| (summaries.len(), Fetched::Syncs(summaries))),
        };

        if !self.session.is_current(&ticket) {
            debug!("Discarding {:?} feed fetched under epoch {}", self.kind, ticket.epoch);
            return PollOutcome::Stale;
        }

        match result {
            Ok((count, fetched)) => {
                match fetched {
                    Fetched::Deployments(records) => self.cache.set_deployments(records),
                    Fetched::Syncs(summaries) => self.cache.set_syncs(summaries),
                }
                debug!("Refreshed {:?} feed with {} items", self.kind, count);
                PollOutcome::Applied { emitted: 0 }
            }
            Err(e) => {
                warn!("Unable to refresh {:?} feed, showing it empty: {}", self.kind, e);
                match self.kind {
                    FeedKind::Deployments => self.cache.degrade_deployments(),
                    FeedKind::Syncs => self.cache.degrade_syncs(),
                }
                PollOutcome::Degraded
            }
        }
    }

    fn clear(&self) {
        match self.kind {
            FeedKind::Deployments => self.cache.set_deployments(Vec::new()),
            FeedKind::Syncs => self.cache.set_syncs(Vec::new()),
        }
    }
}

enum Fetched {
    Deployments(Vec<crate::models::deployment::DeploymentRecord>),
    Syncs(Vec<crate::models::deployment::SyncSummary>),
}

#[async_trait]
impl PollTarget for FeedPoller {
    fn name(&self) -> &'static str {
        match self.kind {
            FeedKind::Deployments => "deployment-feed",
            FeedKind::Syncs => "sync-feed",
        }
    }

    async fn poll(&self) -> Result<(), AgentError> {
        self.poll_once().await;
        Ok(())
    }
}
