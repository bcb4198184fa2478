//! Orchestrator backend API client models

pub mod models;
