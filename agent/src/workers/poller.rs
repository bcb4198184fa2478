//! Polling worker for periodic backend reads

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::errors::AgentError;

/// Something refreshed on a timer
#[async_trait]
pub trait PollTarget: Send + Sync {
    fn name(&self) -> &'static str;

    async fn poll(&self) -> Result<(), AgentError>;
}

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Polling interval
    pub interval: Duration,

    /// Initial delay before first poll
    pub initial_delay: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(7),
            initial_delay: Duration::ZERO,
        }
    }
}

impl Options {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }
}

/// Run the poller worker: poll once after the initial delay, then once per
/// interval until shutdown. A failed poll is logged and retried on the next
/// tick.
pub async fn run<T, S, F>(
    options: &Options,
    target: &T,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    T: PollTarget + ?Sized,
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Poller {} starting (every {:?})", target.name(), options.interval);

    let mut delay = options.initial_delay;
    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller {} shutting down...", target.name());
                return;
            }
            _ = sleep_fn(delay) => {}
        }
        delay = options.interval;

        debug!("Poller {} tick", target.name());
        if let Err(e) = target.poll().await {
            error!("Poller {} failed: {}", target.name(), e);
        }
    }
}
