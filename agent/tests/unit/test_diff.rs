//! Diff engine tests

use cloudpulse::models::notification::{NotificationSource, NotificationType};
use cloudpulse::sync::diff::DiffEngine;

use crate::common::snapshot;

#[test]
fn test_first_snapshot_only_hydrates() {
    let mut engine = DiffEngine::new();
    let emitted = engine.observe(&[
        snapshot(1, "web", "pending"),
        snapshot(2, "db", "failed"),
        snapshot(3, "cache", "active"),
    ]);

    assert!(emitted.is_empty());
    assert!(engine.is_hydrated());
    assert_eq!(engine.tracked(), 3);
    assert_eq!(engine.previous_status(2), Some("failed"));
}

#[test]
fn test_unchanged_snapshot_is_idempotent() {
    let mut engine = DiffEngine::new();
    let snapshots = vec![snapshot(1, "web", "pending"), snapshot(2, "db", "active")];
    engine.observe(&snapshots);

    assert!(engine.observe(&snapshots).is_empty());
    assert!(engine.observe(&snapshots).is_empty());
}

#[test]
fn test_pending_to_active_completes_provisioning() {
    let mut engine = DiffEngine::new();
    engine.observe(&[snapshot(1, "web", "pending")]);

    let emitted = engine.observe(&[snapshot(1, "web", "active")]);
    assert_eq!(emitted.len(), 1);
    let n = &emitted[0];
    assert_eq!(n.kind, NotificationType::Success);
    assert_eq!(n.title, "Provisioning Complete");
    assert_eq!(n.message, "web on AWS changed from pending to active");
    assert_eq!(n.deployment_id, Some(1));
    assert_eq!(n.status.as_deref(), Some("active"));
    assert_eq!(n.source, NotificationSource::Deployment);
}

#[test]
fn test_running_to_failed_reports_failure() {
    let mut engine = DiffEngine::new();
    engine.observe(&[snapshot(4, "api", "running")]);

    let emitted = engine.observe(&[snapshot(4, "api", "failed")]);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].kind, NotificationType::Error);
    assert_eq!(emitted[0].title, "Provisioning Failed");
}

#[test]
fn test_running_to_error_reports_failure() {
    let mut engine = DiffEngine::new();
    engine.observe(&[snapshot(4, "api", "running")]);

    let emitted = engine.observe(&[snapshot(4, "api", "error")]);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].kind, NotificationType::Error);
    assert_eq!(emitted[0].title, "Provisioning Failed");
    assert_eq!(emitted[0].status.as_deref(), Some("error"));
}

#[test]
fn test_provisioning_to_provisioning_is_an_update() {
    let mut engine = DiffEngine::new();
    engine.observe(&[snapshot(5, "queue", "pending")]);

    let emitted = engine.observe(&[snapshot(5, "queue", "in_progress")]);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].kind, NotificationType::Info);
    assert_eq!(emitted[0].title, "Provisioning Update");
}

#[test]
fn test_new_deployments_after_hydration() {
    let mut engine = DiffEngine::new();
    engine.observe(&[]);

    let emitted = engine.observe(&[
        snapshot(10, "a", "pending"),
        snapshot(11, "b", "active"),
        snapshot(12, "c", "error"),
        snapshot(13, "d", "deleting"),
    ]);

    let titles: Vec<&str> = emitted.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Provisioning Started", "Deployment Active", "Deployment Failed"]
    );
    assert_eq!(emitted[0].message, "a on AWS: pending");
    assert_eq!(emitted[0].action.as_deref(), Some("deploy"));
    assert_eq!(engine.tracked(), 4);
}

#[test]
fn test_unclassified_transition_is_silent_but_tracked() {
    let mut engine = DiffEngine::new();
    engine.observe(&[snapshot(1, "web", "active")]);

    assert!(engine.observe(&[snapshot(1, "web", "deleting")]).is_empty());
    assert_eq!(engine.previous_status(1), Some("deleting"));

    // leaving the unclassified status is a regular transition
    let emitted = engine.observe(&[snapshot(1, "web", "failed")]);
    assert_eq!(emitted[0].message, "web on AWS changed from deleting to failed");
}

#[test]
fn test_vanished_deployment_is_forgotten() {
    let mut engine = DiffEngine::new();
    engine.observe(&[snapshot(1, "web", "active"), snapshot(2, "db", "active")]);

    assert!(engine.observe(&[snapshot(1, "web", "active")]).is_empty());
    assert_eq!(engine.previous_status(2), None);

    // coming back counts as a new deployment
    let emitted = engine.observe(&[snapshot(1, "web", "active"), snapshot(2, "db", "active")]);
    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].title, "Deployment Active");
}

#[test]
fn test_reset_suppresses_next_snapshot() {
    let mut engine = DiffEngine::new();
    engine.observe(&[snapshot(1, "web", "pending")]);
    engine.reset();
    assert!(!engine.is_hydrated());

    assert!(engine.observe(&[snapshot(1, "web", "active")]).is_empty());
}
