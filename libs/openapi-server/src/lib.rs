//! cloudpulse local API models

pub mod models;
