//! Server state

use std::sync::Arc;

use crate::authn::session::{Session, SessionValidator};
use crate::cache::feeds::FeedCache;
use crate::notify::store::NotificationStore;
use crate::sync::BackendApi;

/// Server state shared across handlers
pub struct ServerState {
    pub store: Arc<NotificationStore>,
    pub session: Arc<Session>,
    pub feeds: Arc<FeedCache>,
    pub backend: Arc<dyn BackendApi>,
    pub validator: Arc<dyn SessionValidator>,
}

impl ServerState {
    pub fn new(
        store: Arc<NotificationStore>,
        session: Arc<Session>,
        feeds: Arc<FeedCache>,
        backend: Arc<dyn BackendApi>,
        validator: Arc<dyn SessionValidator>,
    ) -> Self {
        Self {
            store,
            session,
            feeds,
            backend,
            validator,
        }
    }
}
