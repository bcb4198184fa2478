//! User-facing notifications: the bounded persisted store and time rendering

pub mod format;
pub mod store;
