//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use openapi_server::models::{
    ActivityEventView, ActivityResponse, CreateNotificationRequest, ErrorResponse, HealthResponse,
    NotificationView, NotificationsResponse, SessionRequest, SessionResponse, SyncResponse,
    UnreadCountResponse,
};
use serde::Deserialize;
use tracing::warn;

use crate::activity::{timeline, ActivityFilter};
use crate::authn::session_token::SessionToken;
use crate::errors::AgentError;
use crate::models::activity::ActivityEvent;
use crate::models::notification::{
    AppNotification, NotificationInput, NotificationSource, NotificationType,
};
use crate::notify::format::format_time;
use crate::server::state::ServerState;
use crate::sync::trigger::trigger_sync;
use crate::utils::version_info;

/// Error rendered as an [`ErrorResponse`]
pub struct ApiError(AgentError);

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self.0 {
            AgentError::ValidationError(_) | AgentError::TokenError(_) => {
                (StatusCode::BAD_REQUEST, "invalid_request")
            }
            e if e.is_unauthorized() => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AgentError::AuthError(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AgentError::BackendError { .. } | AgentError::HttpError(_) => {
                (StatusCode::BAD_GATEWAY, "backend_unavailable")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        let body = ErrorResponse {
            error: error.to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "cloudpulse".to_string(),
        version: version.version,
    })
}

fn notification_view(notification: AppNotification, now: DateTime<Utc>) -> NotificationView {
    NotificationView {
        relative_time: format_time(&notification.created_at, now),
        id: notification.id,
        kind: notification.kind.as_str().to_string(),
        title: notification.title,
        message: notification.message,
        created_at: notification.created_at,
        read: notification.read,
        deployment_id: notification.deployment_id,
        provider: notification.provider,
        resource_name: notification.resource_name,
        status: notification.status,
        action: notification.action,
        source: notification.source.as_str().to_string(),
    }
}

/// Notifications handler, newest first
pub async fn list_notifications_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let now = Utc::now();
    let notifications = state
        .store
        .notifications()
        .await
        .into_iter()
        .map(|n| notification_view(n, now))
        .collect();

    Json(NotificationsResponse {
        notifications,
        unread_count: state.store.unread_count().await,
    })
}

pub async fn unread_count_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(UnreadCountResponse {
        unread_count: state.store.unread_count().await,
    })
}

/// Add a notification on behalf of a collaborator
pub async fn create_notification_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind: NotificationType = request.kind.parse().map_err(AgentError::ValidationError)?;
    let source: NotificationSource = match request.source.as_deref() {
        Some(raw) => raw.parse().map_err(AgentError::ValidationError)?,
        None => NotificationSource::System,
    };
    if request.title.trim().is_empty() || request.message.trim().is_empty() {
        return Err(AgentError::ValidationError("title and message are required".to_string()).into());
    }

    let input = NotificationInput {
        deployment_id: request.deployment_id,
        provider: request.provider,
        resource_name: request.resource_name,
        status: request.status,
        action: request.action,
        ..NotificationInput::new(kind, request.title, request.message, source)
    };
    let notification = state.store.add(input).await;

    Ok((StatusCode::CREATED, Json(notification_view(notification, Utc::now()))))
}

pub async fn mark_all_read_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    state.store.mark_all_read().await;
    StatusCode::NO_CONTENT
}

pub async fn delete_notification_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if state.store.remove(&id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

pub async fn clear_notifications_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    state.store.clear().await;
    StatusCode::NO_CONTENT
}

/// Activity query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub provider: Option<String>,
    pub source: Option<String>,
    pub q: Option<String>,
}

fn activity_view(event: &ActivityEvent) -> ActivityEventView {
    ActivityEventView {
        id: event.id.clone(),
        resource_name: event.resource_name.clone(),
        provider: event.provider.as_str().to_string(),
        action: event.action.clone(),
        status: event.status.as_str().to_string(),
        timestamp: event.timestamp.clone(),
        actor: event.actor.clone(),
        source: event.source.as_str().to_string(),
        details: event.details.clone(),
        deployment_id: event.deployment_id,
    }
}

/// Merged activity feed handler
pub async fn activity_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ActivityQuery>,
) -> impl IntoResponse {
    let filter = ActivityFilter::from_params(
        query.provider.as_deref(),
        query.source.as_deref(),
        query.q.as_deref(),
    );
    let events = timeline(&state.store, &state.feeds).await;
    let events: Vec<ActivityEventView> = filter.apply(&events).into_iter().map(activity_view).collect();

    let mut degraded = Vec::new();
    let (deployments, syncs) = state.feeds.is_degraded();
    if deployments {
        degraded.push("deployments".to_string());
    }
    if syncs {
        degraded.push("syncs".to_string());
    }

    Json(ActivityResponse {
        total: events.len(),
        events,
        degraded,
    })
}

fn session_view(state: &ServerState) -> SessionResponse {
    let auth = state.session.state();
    SessionResponse {
        authenticated: auth.authenticated,
        loading: auth.loading,
        epoch: state.session.epoch(),
    }
}

pub async fn get_session_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(session_view(&state))
}

/// Log in with a bearer token
pub async fn login_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = SessionToken::from_raw(request.token)?;
    state.session.login(token, state.validator.as_ref()).await?;
    Ok(Json(session_view(&state)))
}

pub async fn logout_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    state.session.logout();
    state.feeds.clear();
    Json(session_view(&state))
}

/// Sync handler
pub async fn sync_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    match trigger_sync(state.backend.as_ref(), &state.session, &state.store).await {
        Ok(message) => Json(SyncResponse {
            success: true,
            message,
        }),
        Err(e) => {
            warn!("Inventory sync failed: {}", e);
            Json(SyncResponse {
                success: false,
                message: format!("Sync failed: {}", e),
            })
        }
    }
}
