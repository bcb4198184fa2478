//! Session expiry worker

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, info};

use crate::authn::session::Session;

/// Session watch worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Check interval
    pub check_interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(60),
        }
    }
}

/// Run the session watch worker. Ends the session once its token expires so
/// the pollers stop and the diff engine drops its hydrated state.
pub async fn run<S, F>(
    options: &Options,
    session: &Session,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Session watch worker starting...");

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Session watch worker shutting down...");
                return;
            }
            _ = sleep_fn(options.check_interval) => {}
        }

        debug!("Checking session expiration...");
        if session.expire_if_needed() {
            info!("Session expired, polling paused until the next login");
        } else if let Some(expires_at) = session.expires_at() {
            debug!("Session token valid until {}", expires_at);
        }
    }
}
