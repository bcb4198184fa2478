//! cloudpulse library
//!
//! Activity and notification sync engine for the multi-cloud dashboard.

pub mod activity;
pub mod app;
pub mod authn;
pub mod cache;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod notify;
pub mod server;
pub mod status;
pub mod storage;
pub mod sync;
pub mod utils;
pub mod workers;
