//! Activity aggregator
//!
//! Merges the notification store with the polled deployment-creation records
//! and sync summaries into one deduplicated timeline, newest first.

pub mod filter;
pub mod merge;
pub mod normalize;

pub use filter::ActivityFilter;
pub use merge::{aggregate, timeline};
