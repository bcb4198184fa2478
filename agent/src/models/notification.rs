//! Notification models

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::notification_id;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Success,
    Warning,
    Info,
    Error,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Success => "success",
            NotificationType::Warning => "warning",
            NotificationType::Info => "info",
            NotificationType::Error => "error",
        }
    }

    /// Title used when a caller supplies a blank one
    pub fn default_title(&self) -> &'static str {
        match self {
            NotificationType::Success => "Success",
            NotificationType::Warning => "Warning",
            NotificationType::Info => "Info",
            NotificationType::Error => "Error",
        }
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(NotificationType::Success),
            "warning" => Ok(NotificationType::Warning),
            "info" => Ok(NotificationType::Info),
            "error" => Ok(NotificationType::Error),
            _ => Err(format!("Invalid notification type: {}", s)),
        }
    }
}

/// Subsystem a notification originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSource {
    Deployment,
    Sync,
    System,
}

impl NotificationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationSource::Deployment => "deployment",
            NotificationSource::Sync => "sync",
            NotificationSource::System => "system",
        }
    }
}

impl std::str::FromStr for NotificationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deployment" => Ok(NotificationSource::Deployment),
            "sync" => Ok(NotificationSource::Sync),
            "system" => Ok(NotificationSource::System),
            _ => Err(format!("Invalid notification source: {}", s)),
        }
    }
}

/// A persisted user-facing notification.
///
/// Field names follow the persisted camelCase layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppNotification {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: NotificationType,

    pub title: String,

    pub message: String,

    /// ISO-8601 creation time
    pub created_at: String,

    #[serde(default)]
    pub read: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    pub source: NotificationSource,
}

impl AppNotification {
    /// Materialize an input into a fresh, unread notification. Blank titles and
    /// messages are filled in so the result always passes [`is_well_formed`].
    ///
    /// [`is_well_formed`]: Self::is_well_formed
    pub fn from_input(input: NotificationInput, now: DateTime<Utc>) -> Self {
        let title = if input.title.trim().is_empty() {
            input.kind.default_title().to_string()
        } else {
            input.title
        };
        let message = if input.message.trim().is_empty() {
            title.clone()
        } else {
            input.message
        };
        Self {
            id: notification_id(input.deployment_id, now),
            kind: input.kind,
            title,
            message,
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            read: false,
            deployment_id: input.deployment_id,
            provider: input.provider,
            resource_name: input.resource_name,
            status: input.status,
            action: input.action,
            source: input.source,
        }
    }

    /// Structural validation applied when rehydrating persisted entries
    pub fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty() && !self.title.trim().is_empty() && !self.message.trim().is_empty()
    }
}

/// Everything a caller supplies to `add`; id, creation time and read flag
/// are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationInput {
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub deployment_id: Option<u64>,
    pub provider: Option<String>,
    pub resource_name: Option<String>,
    pub status: Option<String>,
    pub action: Option<String>,
    pub source: NotificationSource,
}

impl NotificationInput {
    pub fn new(
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        source: NotificationSource,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            deployment_id: None,
            provider: None,
            resource_name: None,
            status: None,
            action: None,
            source,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}
