//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::AgentError;
use crate::server::handlers::{
    activity_handler, clear_notifications_handler, create_notification_handler,
    delete_notification_handler, get_session_handler, health_handler, list_notifications_handler,
    login_handler, logout_handler, mark_all_read_handler, sync_handler, unread_count_handler,
};
use crate::server::state::ServerState;

/// Build the local API router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(health_handler))
        // Notifications
        .route(
            "/notifications",
            get(list_notifications_handler)
                .post(create_notification_handler)
                .delete(clear_notifications_handler),
        )
        .route("/notifications/unread-count", get(unread_count_handler))
        .route("/notifications/read-all", post(mark_all_read_handler))
        .route("/notifications/{id}", delete(delete_notification_handler))
        // Activity
        .route("/activity", get(activity_handler))
        // Session
        .route(
            "/session",
            get(get_session_handler).put(login_handler).delete(logout_handler),
        )
        // Inventory sync
        .route("/sync", post(sync_handler))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), AgentError>>, AgentError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AgentError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| AgentError::ServerError(e.to_string()))
    });

    Ok(handle)
}
