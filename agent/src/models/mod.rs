//! Domain models

pub mod activity;
pub mod deployment;
pub mod notification;
