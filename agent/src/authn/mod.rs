//! Authentication signal consumed by the pollers

pub mod session;
pub mod session_token;
