//! Deployment status diff engine
//!
//! Compares each snapshot poll against the statuses seen on the previous poll
//! and turns meaningful transitions into notification inputs. The first poll
//! of a session only records statuses (hydration) so that logging in never
//! replays the state of every existing deployment.

use std::collections::HashMap;

use crate::models::deployment::DeploymentSnapshot;
use crate::models::notification::{NotificationInput, NotificationSource, NotificationType};
use crate::status::StatusClass;

/// Diff engine state for one authenticated session
#[derive(Debug, Default)]
pub struct DiffEngine {
    previous: HashMap<u64, String>,
    hydrated: bool,
    epoch: Option<u64>,
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Session epoch the engine was hydrated under
    pub fn epoch(&self) -> Option<u64> {
        self.epoch
    }

    /// Last observed raw status of a deployment
    pub fn previous_status(&self, id: u64) -> Option<&str> {
        self.previous.get(&id).map(String::as_str)
    }

    pub fn tracked(&self) -> usize {
        self.previous.len()
    }

    /// Forget everything; the next observation hydrates again
    pub fn reset(&mut self) {
        self.previous.clear();
        self.hydrated = false;
        self.epoch = None;
    }

    /// Observe a snapshot taken under session `epoch`. A different epoch than
    /// the one the engine hydrated under starts a fresh session.
    pub fn observe_in(&mut self, epoch: u64, snapshots: &[DeploymentSnapshot]) -> Vec<NotificationInput> {
        if self.epoch != Some(epoch) {
            self.reset();
            self.epoch = Some(epoch);
        }
        self.observe(snapshots)
    }

    /// Observe one poll's snapshot list and return the notifications it
    /// warrants, in snapshot order.
    pub fn observe(&mut self, snapshots: &[DeploymentSnapshot]) -> Vec<NotificationInput> {
        let current: HashMap<u64, String> = snapshots
            .iter()
            .map(|s| (s.id, s.status.clone()))
            .collect();

        if !self.hydrated {
            self.previous = current;
            self.hydrated = true;
            return Vec::new();
        }

        let mut emitted = Vec::new();
        for snapshot in snapshots {
            let input = match self.previous.get(&snapshot.id) {
                None => appeared(snapshot),
                Some(previous) if *previous == snapshot.status => None,
                Some(previous) => transitioned(previous, snapshot),
            };
            emitted.extend(input);
        }

        self.previous = current;
        emitted
    }
}

fn provider_label(provider: &str) -> String {
    if provider.is_empty() {
        "UNKNOWN".to_string()
    } else {
        provider.to_uppercase()
    }
}

fn appeared(snapshot: &DeploymentSnapshot) -> Option<NotificationInput> {
    let (kind, title) = match StatusClass::classify(&snapshot.status) {
        StatusClass::Provisioning => (NotificationType::Info, "Provisioning Started"),
        StatusClass::Success => (NotificationType::Success, "Deployment Active"),
        StatusClass::Failure => (NotificationType::Error, "Deployment Failed"),
        StatusClass::Unclassified => return None,
    };
    let message = format!(
        "{} on {}: {}",
        snapshot.resource_name,
        provider_label(&snapshot.provider),
        snapshot.status
    );
    Some(input_for(snapshot, kind, title, message, "deploy"))
}

fn transitioned(previous: &str, snapshot: &DeploymentSnapshot) -> Option<NotificationInput> {
    let (kind, title) = match StatusClass::classify(&snapshot.status) {
        StatusClass::Success => (NotificationType::Success, "Provisioning Complete"),
        StatusClass::Failure => (NotificationType::Error, "Provisioning Failed"),
        StatusClass::Provisioning => (NotificationType::Info, "Provisioning Update"),
        StatusClass::Unclassified => return None,
    };
    let message = format!(
        "{} on {} changed from {} to {}",
        snapshot.resource_name,
        provider_label(&snapshot.provider),
        previous,
        snapshot.status
    );
    Some(input_for(snapshot, kind, title, message, "update"))
}

fn input_for(
    snapshot: &DeploymentSnapshot,
    kind: NotificationType,
    title: &str,
    message: String,
    action: &str,
) -> NotificationInput {
    NotificationInput {
        deployment_id: Some(snapshot.id),
        provider: Some(snapshot.provider.clone()).filter(|p| !p.is_empty()),
        resource_name: Some(snapshot.resource_name.clone()),
        status: Some(snapshot.status.clone()),
        ..NotificationInput::new(kind, title, message, NotificationSource::Deployment)
            .with_action(action)
    }
}
