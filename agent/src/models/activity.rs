//! Activity feed models

use serde::{Deserialize, Serialize};

use crate::models::notification::NotificationSource;
use crate::status::DisplayStatus;

/// Cloud provider, normalized to the closed set the dashboard renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Azure,
    Gcp,
}

impl Provider {
    /// Case-folded match; anything unrecognized becomes `Aws`.
    pub fn normalize(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(Provider::Aws)
    }

    /// Strict parse used for caller-supplied filters
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "aws" => Some(Provider::Aws),
            "azure" => Some(Provider::Azure),
            "gcp" => Some(Provider::Gcp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
            Provider::Gcp => "gcp",
        }
    }
}

/// Which kind of real-world activity an event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySource {
    Deployment,
    Sync,
    System,
}

impl ActivitySource {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "deployment" => Some(ActivitySource::Deployment),
            "sync" => Some(ActivitySource::Sync),
            "system" => Some(ActivitySource::System),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivitySource::Deployment => "deployment",
            ActivitySource::Sync => "sync",
            ActivitySource::System => "system",
        }
    }
}

impl From<NotificationSource> for ActivitySource {
    fn from(source: NotificationSource) -> Self {
        match source {
            NotificationSource::Deployment => ActivitySource::Deployment,
            NotificationSource::Sync => ActivitySource::Sync,
            NotificationSource::System => ActivitySource::System,
        }
    }
}

/// One entry of the merged activity timeline. Derived on every read, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Composite `source:identifying-fields` key
    pub id: String,
    pub resource_name: String,
    pub provider: Provider,
    pub action: String,
    pub status: DisplayStatus,
    pub timestamp: String,
    pub actor: String,
    pub source: ActivitySource,
    pub details: Option<String>,
    pub deployment_id: Option<u64>,
}

/// Identity used to collapse events describing the same transition
pub type DedupeKey = (ActivitySource, String, String, DisplayStatus, String);

impl ActivityEvent {
    pub fn dedupe_key(&self) -> DedupeKey {
        (
            self.source,
            self.resource_name.clone(),
            self.action.clone(),
            self.status,
            self.timestamp.clone(),
        )
    }
}
