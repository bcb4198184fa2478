//! Manual inventory sync

use tracing::info;

use crate::authn::session::Session;
use crate::errors::AgentError;
use crate::models::notification::{NotificationInput, NotificationSource, NotificationType};
use crate::notify::store::NotificationStore;
use crate::sync::BackendApi;

const DEFAULT_SYNC_MESSAGE: &str = "Inventory sync triggered";

/// Ask the backend to resync the cloud inventory and record it in the store
pub async fn trigger_sync(
    backend: &dyn BackendApi,
    session: &Session,
    store: &NotificationStore,
) -> Result<String, AgentError> {
    let ticket = session.ticket().ok_or(AgentError::NotAuthenticated)?;
    let message = backend.trigger_sync(&ticket.token).await?;
    let message = if message.trim().is_empty() {
        DEFAULT_SYNC_MESSAGE.to_string()
    } else {
        message
    };
    info!("Inventory sync triggered: {}", message);

    let input = NotificationInput::new(
        NotificationType::Info,
        "Sync Triggered",
        message.clone(),
        NotificationSource::Sync,
    )
    .with_action("sync");
    store.add(input).await;

    Ok(message)
}
