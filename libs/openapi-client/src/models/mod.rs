//! Backend API models
//!
//! Every field is optional: the backend is an external collaborator and list
//! items are decoded one at a time so a single bad record never poisons a
//! whole response.

use serde::{Deserialize, Serialize};

/// A list payload: either a bare array or an object exposing an `items` array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    Bare(Vec<serde_json::Value>),
    Wrapped { items: Vec<serde_json::Value> },
}

impl ListEnvelope {
    /// Normalize any JSON payload into its list items. Anything that is not a
    /// list or an `items` wrapper yields no items.
    pub fn items_of(value: serde_json::Value) -> Vec<serde_json::Value> {
        match serde_json::from_value::<ListEnvelope>(value) {
            Ok(ListEnvelope::Bare(items)) => items,
            Ok(ListEnvelope::Wrapped { items }) => items,
            Err(_) => Vec::new(),
        }
    }
}

/// Item of `GET /deployments/`
///
/// Alternate spellings of a field are kept as separate fields rather than
/// serde aliases, since a payload carrying two spellings of one key must still
/// decode. The accessors read them canonical-first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentItem {
    /// Numeric id, sometimes rendered as a string
    #[serde(default)]
    pub id: Option<serde_json::Value>,

    #[serde(default)]
    pub resource_name: Option<String>,
    #[serde(default, rename = "resourceName", skip_serializing_if = "Option::is_none")]
    pub resource_name_camel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default, rename = "resourceType", skip_serializing_if = "Option::is_none")]
    pub resource_type_camel: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default, rename = "startedAt", skip_serializing_if = "Option::is_none")]
    pub started_at_camel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default, rename = "completedAt", skip_serializing_if = "Option::is_none")]
    pub completed_at_camel: Option<String>,

    #[serde(default)]
    pub duration_seconds: Option<i64>,
    #[serde(default, rename = "durationSeconds", skip_serializing_if = "Option::is_none")]
    pub duration_seconds_camel: Option<i64>,
}

impl DeploymentItem {
    pub fn resource_name(&self) -> Option<String> {
        first_present([&self.resource_name, &self.resource_name_camel, &self.name])
    }

    pub fn resource_type(&self) -> Option<String> {
        first_present([&self.resource_type, &self.resource_type_camel, &self.kind])
    }

    pub fn started_at(&self) -> Option<String> {
        first_present([&self.started_at, &self.started_at_camel, &self.created_at])
    }

    pub fn completed_at(&self) -> Option<String> {
        first_present([&self.completed_at, &self.completed_at_camel])
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.duration_seconds.or(self.duration_seconds_camel)
    }
}

/// Item of the `recent_activity` list in `GET /dashboard/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncActivityItem {
    #[serde(default)]
    pub resource_name: Option<String>,
    #[serde(default, rename = "resourceName", skip_serializing_if = "Option::is_none")]
    pub resource_name_camel: Option<String>,

    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub last_synced: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<String>,
    #[serde(default, rename = "lastSyncedAt", skip_serializing_if = "Option::is_none")]
    pub last_synced_camel: Option<String>,
}

impl SyncActivityItem {
    pub fn resource_name(&self) -> Option<String> {
        first_present([&self.resource_name, &self.resource_name_camel])
    }

    pub fn resource_type(&self) -> Option<String> {
        first_present([&self.kind, &self.resource_type])
    }

    pub fn last_synced(&self) -> Option<String> {
        first_present([&self.last_synced, &self.last_synced_at, &self.last_synced_camel])
    }
}

/// First candidate that is present and not blank, trimmed
fn first_present<const N: usize>(candidates: [&Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .filter_map(|value| value.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Response of `GET /auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Response of `POST /dashboard/sync/trigger`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncTriggerResponse {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHealth {
    pub status: String,
}
