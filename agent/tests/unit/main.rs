//! Integration tests for the cloudpulse engine

mod common;
mod test_activity;
mod test_api;
mod test_diff;
mod test_store;
