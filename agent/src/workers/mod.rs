//! Background workers

pub mod poller;
pub mod session_watch;
