//! Orchestrator backend REST client

pub mod auth;
pub mod client;
pub mod dashboard;
pub mod deployments;
