//! Conversion of each source into [`ActivityEvent`]s

use crate::models::activity::{ActivityEvent, ActivitySource, Provider};
use crate::models::deployment::{DeploymentRecord, SyncSummary};
use crate::models::notification::{AppNotification, NotificationType};
use crate::status::DisplayStatus;

fn status_for_type(kind: NotificationType) -> DisplayStatus {
    match kind {
        NotificationType::Success => DisplayStatus::Success,
        NotificationType::Error => DisplayStatus::Failed,
        NotificationType::Warning => DisplayStatus::Degraded,
        NotificationType::Info => DisplayStatus::Provisioning,
    }
}

pub fn from_notification(notification: &AppNotification) -> ActivityEvent {
    let status = match notification.status.as_deref() {
        Some(raw) if !raw.trim().is_empty() => DisplayStatus::normalize(raw),
        _ => status_for_type(notification.kind),
    };

    ActivityEvent {
        id: format!("notification:{}", notification.id),
        resource_name: notification
            .resource_name
            .clone()
            .unwrap_or_else(|| notification.title.clone()),
        provider: Provider::normalize(notification.provider.as_deref().unwrap_or_default()),
        action: notification
            .action
            .clone()
            .unwrap_or_else(|| "notify".to_string()),
        status,
        timestamp: notification.created_at.clone(),
        actor: "system".to_string(),
        source: ActivitySource::from(notification.source),
        details: Some(format!("{}: {}", notification.title, notification.message)),
        deployment_id: notification.deployment_id,
    }
}

pub fn from_deployment(record: &DeploymentRecord) -> ActivityEvent {
    ActivityEvent {
        id: format!("deployment:{}:{}", record.id, record.started_at),
        resource_name: record.resource_name.clone(),
        provider: Provider::normalize(&record.provider),
        action: "deploy".to_string(),
        status: DisplayStatus::normalize(&record.status),
        timestamp: record.started_at.clone(),
        actor: "user".to_string(),
        source: ActivitySource::Deployment,
        details: Some(format!("{} deployment #{}", record.resource_type, record.id)),
        deployment_id: Some(record.id),
    }
}

pub fn from_sync(summary: &SyncSummary) -> ActivityEvent {
    let provider = Provider::normalize(&summary.provider);
    let timestamp = summary.last_synced_at.clone().unwrap_or_default();
    let details = match &summary.region {
        Some(region) => format!("{} in {}", summary.resource_type, region),
        None => summary.resource_type.clone(),
    };

    ActivityEvent {
        id: format!(
            "sync:{}:{}:{}",
            provider.as_str(),
            summary.resource_name,
            timestamp
        ),
        resource_name: summary.resource_name.clone(),
        provider,
        action: "sync".to_string(),
        status: DisplayStatus::normalize(&summary.status),
        timestamp,
        actor: "system".to_string(),
        source: ActivitySource::Sync,
        details: Some(details),
        deployment_id: None,
    }
}
