//! Deployment status classification
//!
//! Two views over the same raw status strings: the coarse [`StatusClass`]
//! that drives notification type and title selection, and the wider
//! [`DisplayStatus`] used when rendering the activity feed.

use serde::{Deserialize, Serialize};

/// Coarse semantic bucket of a raw deployment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Provisioning,
    Success,
    Failure,
    Unclassified,
}

impl StatusClass {
    /// Classify a raw status string. Matching is case-insensitive.
    pub fn classify(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "pending" | "provisioning" | "running" | "in_progress" => StatusClass::Provisioning,
            "active" | "success" | "completed" => StatusClass::Success,
            "failed" | "error" => StatusClass::Failure,
            _ => StatusClass::Unclassified,
        }
    }
}

/// Normalized status shown in the activity feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Provisioning,
    Success,
    Failed,
    Running,
    Stopped,
    Healthy,
    Degraded,
    Destroying,
    Inactive,
}

impl DisplayStatus {
    /// Map a raw status onto the display set. Unknown values fall back to
    /// `Provisioning`.
    pub fn normalize(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "pending" | "provisioning" | "in_progress" => DisplayStatus::Provisioning,
            "active" | "success" | "completed" => DisplayStatus::Success,
            "failed" | "error" => DisplayStatus::Failed,
            "running" => DisplayStatus::Running,
            "stopped" => DisplayStatus::Stopped,
            "healthy" => DisplayStatus::Healthy,
            "degraded" => DisplayStatus::Degraded,
            "destroying" => DisplayStatus::Destroying,
            "inactive" => DisplayStatus::Inactive,
            _ => DisplayStatus::Provisioning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Provisioning => "provisioning",
            DisplayStatus::Success => "success",
            DisplayStatus::Failed => "failed",
            DisplayStatus::Running => "running",
            DisplayStatus::Stopped => "stopped",
            DisplayStatus::Healthy => "healthy",
            DisplayStatus::Degraded => "degraded",
            DisplayStatus::Destroying => "destroying",
            DisplayStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
