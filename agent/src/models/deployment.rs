//! Deployment models
//!
//! Backend payloads are coerced defensively: records that lack a usable id or
//! status are dropped here and never reach the engine.

use openapi_client::models::{DeploymentItem, ListEnvelope, SyncActivityItem};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One deployment as observed by a single snapshot poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentSnapshot {
    /// Positive deployment id
    pub id: u64,

    pub resource_name: String,

    /// Lowercase raw status
    pub status: String,

    pub provider: String,
}

/// A deployment-creation record for the activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub id: u64,
    pub resource_name: String,
    pub provider: String,
    pub resource_type: String,
    pub status: String,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub duration_seconds: Option<u64>,
}

/// A recent inventory-sync summary for the activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub resource_name: String,
    pub provider: String,
    pub resource_type: String,
    pub status: String,
    pub region: Option<String>,
    pub last_synced_at: Option<String>,
}

/// Coerce a JSON id (number or numeric string) to a positive integer
pub fn coerce_id(value: &serde_json::Value) -> Option<u64> {
    let id = match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f > 0.0).map(|f| f as u64)),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    (id > 0).then_some(id)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl DeploymentSnapshot {
    pub fn from_item(item: &DeploymentItem) -> Option<Self> {
        let id = item.id.as_ref().and_then(coerce_id)?;
        let status = non_empty(item.status.clone())?.to_lowercase();
        Some(Self {
            id,
            resource_name: item
                .resource_name()
                .unwrap_or_else(|| format!("deployment-{}", id)),
            status,
            provider: item.provider.clone().unwrap_or_default(),
        })
    }

    /// Decode a snapshot list from a raw backend payload
    pub fn list_from_payload(payload: serde_json::Value) -> Vec<Self> {
        decode_items::<DeploymentItem, _>(payload, |item| Self::from_item(&item))
    }
}

impl DeploymentRecord {
    pub fn from_item(item: &DeploymentItem) -> Option<Self> {
        let snapshot = DeploymentSnapshot::from_item(item)?;
        let started_at = item.started_at()?;
        Some(Self {
            id: snapshot.id,
            resource_name: snapshot.resource_name,
            provider: snapshot.provider,
            resource_type: item.resource_type().unwrap_or_else(|| "resource".to_string()),
            status: snapshot.status,
            started_at,
            completed_at: item.completed_at(),
            duration_seconds: item.duration_seconds().and_then(|d| u64::try_from(d).ok()),
        })
    }

    pub fn list_from_payload(payload: serde_json::Value) -> Vec<Self> {
        decode_items::<DeploymentItem, _>(payload, |item| Self::from_item(&item))
    }
}

impl SyncSummary {
    pub fn from_item(item: &SyncActivityItem) -> Option<Self> {
        let resource_name = item.resource_name()?;
        Some(Self {
            resource_name,
            provider: item.provider.clone().unwrap_or_default(),
            resource_type: item.resource_type().unwrap_or_else(|| "resource".to_string()),
            status: non_empty(item.status.clone())
                .map(|s| s.to_lowercase())
                .unwrap_or_default(),
            region: non_empty(item.region.clone()),
            last_synced_at: item.last_synced(),
        })
    }

    pub fn list_from_payload(payload: serde_json::Value) -> Vec<Self> {
        decode_items::<SyncActivityItem, _>(payload, |item| Self::from_item(&item))
    }
}

fn decode_items<I, T>(payload: serde_json::Value, convert: impl Fn(I) -> Option<T>) -> Vec<T>
where
    I: serde::de::DeserializeOwned,
{
    let items = ListEnvelope::items_of(payload);
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|value| serde_json::from_value::<I>(value).ok())
        .filter_map(convert)
        .collect();
    if decoded.len() < total {
        debug!("Dropped {} malformed records of {}", total - decoded.len(), total);
    }
    decoded
}
