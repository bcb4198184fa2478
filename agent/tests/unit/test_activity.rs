//! Activity aggregation tests

use cloudpulse::activity::{aggregate, ActivityFilter};
use cloudpulse::models::activity::{ActivitySource, Provider};
use cloudpulse::models::notification::{
    AppNotification, NotificationInput, NotificationSource, NotificationType,
};
use cloudpulse::status::DisplayStatus;

use crate::common::{record, sync_summary};

fn notification(title: &str, created_at: &str) -> AppNotification {
    AppNotification {
        created_at: created_at.to_string(),
        ..AppNotification::from_input(
            NotificationInput::new(
                NotificationType::Info,
                title,
                "details",
                NotificationSource::System,
            ),
            chrono::Utc::now(),
        )
    }
}

#[test]
fn test_notification_wins_duplicate_with_deployment_record() {
    let started_at = "2025-03-01T12:00:00Z";
    let mut n = notification("Deployment Active", started_at);
    n.source = NotificationSource::Deployment;
    n.resource_name = Some("web".to_string());
    n.action = Some("deploy".to_string());
    n.status = Some("active".to_string());
    n.deployment_id = Some(7);

    let events = aggregate(&[n.clone()], &[record(7, "web", "active", started_at)], &[]);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, format!("notification:{}", n.id));
    assert_eq!(events[0].actor, "system");
}

#[test]
fn test_distinct_status_is_not_a_duplicate() {
    let started_at = "2025-03-01T12:00:00Z";
    let events = aggregate(
        &[],
        &[
            record(7, "web", "active", started_at),
            record(8, "web", "failed", started_at),
        ],
        &[],
    );
    assert_eq!(events.len(), 2);
}

#[test]
fn test_newest_first_with_unparsable_last() {
    let events = aggregate(
        &[notification("middle", "2025-03-01T12:00:00.000Z")],
        &[
            record(1, "old", "active", "2025-02-01T08:00:00"),
            record(2, "broken", "active", "yesterday-ish"),
        ],
        &[sync_summary("bucket-a", "gcp", "2025-03-02T09:30:00Z")],
    );

    let names: Vec<&str> = events.iter().map(|e| e.resource_name.as_str()).collect();
    assert_eq!(names, vec!["bucket-a", "middle", "old", "broken"]);
}

#[test]
fn test_equal_timestamps_keep_merge_order() {
    let ts = "2025-03-01T12:00:00Z";
    let events = aggregate(
        &[notification("from-store", ts)],
        &[record(1, "from-deployments", "pending", ts)],
        &[sync_summary("from-syncs", "aws", ts)],
    );

    let sources: Vec<ActivitySource> = events.iter().map(|e| e.source).collect();
    assert_eq!(
        sources,
        vec![ActivitySource::System, ActivitySource::Deployment, ActivitySource::Sync]
    );
}

#[test]
fn test_normalized_fields() {
    let events = aggregate(
        &[],
        &[record(9, "web", "in_progress", "2025-03-01T12:00:00Z")],
        &[sync_summary("bucket", "Azure", "2025-03-01T11:00:00Z")],
    );

    let deploy = &events[0];
    assert_eq!(deploy.id, "deployment:9:2025-03-01T12:00:00Z");
    assert_eq!(deploy.action, "deploy");
    assert_eq!(deploy.actor, "user");
    assert_eq!(deploy.status, DisplayStatus::Provisioning);
    assert_eq!(deploy.details.as_deref(), Some("vm deployment #9"));

    let sync = &events[1];
    assert_eq!(sync.provider, Provider::Azure);
    assert_eq!(sync.id, "sync:azure:bucket:2025-03-01T11:00:00Z");
    assert_eq!(sync.details.as_deref(), Some("bucket in us-east-1"));
}

#[test]
fn test_filters_are_conjunctive() {
    let events = aggregate(
        &[],
        &[
            record(1, "web-frontend", "active", "2025-03-01T12:00:00Z"),
            record(2, "db", "active", "2025-03-01T11:00:00Z"),
        ],
        &[
            sync_summary("web-assets", "gcp", "2025-03-01T10:00:00Z"),
            sync_summary("logs", "aws", "2025-03-01T09:00:00Z"),
        ],
    );

    let all = ActivityFilter::from_params(Some("all"), Some("all"), Some("  "));
    assert_eq!(all.apply(&events).len(), 4);

    let web = ActivityFilter::from_params(None, None, Some("WEB"));
    assert_eq!(web.apply(&events).len(), 2);

    let gcp_web = ActivityFilter::from_params(Some("gcp"), None, Some("web"));
    let matched = gcp_web.apply(&events);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].resource_name, "web-assets");

    let deployments = ActivityFilter::from_params(None, Some("deployment"), None);
    assert!(deployments
        .apply(&events)
        .iter()
        .all(|e| e.source == ActivitySource::Deployment));

    // details are searched too
    let by_details = ActivityFilter::from_params(None, None, Some("deployment #2"));
    assert_eq!(by_details.apply(&events)[0].resource_name, "db");
}

#[test]
fn test_unknown_filter_values_mean_all() {
    let filter = ActivityFilter::from_params(Some("oracle"), Some("telemetry"), None);
    assert_eq!(filter, ActivityFilter::default());
}
