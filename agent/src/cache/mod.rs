//! In-memory caches of polled data

pub mod feeds;
