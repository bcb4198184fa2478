//! Merge, deduplicate and order the activity sources

use std::collections::HashSet;

use crate::activity::normalize::{from_deployment, from_notification, from_sync};
use crate::cache::feeds::FeedCache;
use crate::models::activity::ActivityEvent;
use crate::models::deployment::{DeploymentRecord, SyncSummary};
use crate::models::notification::AppNotification;
use crate::notify::store::NotificationStore;
use crate::utils::parse_timestamp;

/// Build the unified timeline.
///
/// Sources are concatenated in priority order (notifications, deployment
/// records, sync summaries); of events sharing a dedupe key only the first is
/// kept. The result is stably sorted newest first, with unparsable timestamps
/// last.
pub fn aggregate(
    notifications: &[AppNotification],
    deployments: &[DeploymentRecord],
    syncs: &[SyncSummary],
) -> Vec<ActivityEvent> {
    let candidates = notifications
        .iter()
        .map(from_notification)
        .chain(deployments.iter().map(from_deployment))
        .chain(syncs.iter().map(from_sync));

    let mut events = dedupe(candidates);
    sort_newest_first(&mut events);
    events
}

/// Aggregate whatever the store and the feed cache hold right now
pub async fn timeline(store: &NotificationStore, feeds: &FeedCache) -> Vec<ActivityEvent> {
    let notifications = store.notifications().await;
    aggregate(&notifications, &feeds.deployments(), &feeds.syncs())
}

/// Keep the first event of each dedupe key
pub fn dedupe(events: impl IntoIterator<Item = ActivityEvent>) -> Vec<ActivityEvent> {
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|event| seen.insert(event.dedupe_key()))
        .collect()
}

/// Epoch milliseconds used for ordering; unparsable timestamps count as 0
pub fn sort_millis(timestamp: &str) -> i64 {
    parse_timestamp(timestamp)
        .map(|dt| dt.timestamp_millis())
        .unwrap_or(0)
}

pub fn sort_newest_first(events: &mut [ActivityEvent]) {
    events.sort_by_cached_key(|event| std::cmp::Reverse(sort_millis(&event.timestamp)));
}
