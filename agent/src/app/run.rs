//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::app::options::{AppOptions, LifecycleOptions};
use crate::app::state::AppState;
use crate::authn::session::SessionValidator;
use crate::authn::session_token::SessionToken;
use crate::errors::AgentError;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::sync::BackendApi;
use crate::workers::poller::{self, PollTarget};
use crate::workers::session_watch;

/// Run the cloudpulse agent
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), AgentError> {
    info!("Initializing cloudpulse...");

    // Create shutdown channel
    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
    let mut shutdown_manager = ShutdownManager::new(shutdown_tx.clone(), options.lifecycle.clone());

    if let Err(e) = init(&options, &shutdown_tx, &mut shutdown_manager).await {
        error!("Failed to start cloudpulse: {}", e);
        shutdown_manager.shutdown().await?;
        return Err(e);
    }

    shutdown_signal.await;
    info!("Shutdown signal received, shutting down...");

    drop(shutdown_tx);
    shutdown_manager.shutdown().await
}

// =============================== INITIALIZATION ================================== //

async fn init(
    options: &AppOptions,
    shutdown_tx: &broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<Arc<AppState>, AgentError> {
    let app_state = Arc::new(AppState::init(options).await?);

    if let Some(raw) = &options.token {
        login_at_startup(&app_state, raw).await;
    } else {
        info!("No token configured, waiting for a login on the local API");
    }

    init_session_watch_worker(
        &app_state,
        options.session_watch.clone(),
        shutdown_manager,
        shutdown_tx.subscribe(),
    )?;

    let targets: [(Arc<dyn PollTarget>, &poller::Options); 3] = [
        (app_state.watcher.clone() as Arc<dyn PollTarget>, &options.snapshot_poller),
        (app_state.deployment_feed.clone() as Arc<dyn PollTarget>, &options.deployments_poller),
        (app_state.sync_feed.clone() as Arc<dyn PollTarget>, &options.syncs_poller),
    ];
    for (target, poller_options) in targets {
        init_poller_worker(
            target,
            poller_options.clone(),
            shutdown_manager,
            shutdown_tx.subscribe(),
        )?;
    }

    if options.enable_server {
        init_server(options, &app_state, shutdown_manager, shutdown_tx.subscribe()).await?;
    }

    Ok(app_state)
}

async fn login_at_startup(app_state: &AppState, raw: &str) {
    let token = match SessionToken::from_raw(raw) {
        Ok(token) => token,
        Err(e) => {
            warn!("Ignoring configured token: {}", e);
            return;
        }
    };
    if let Err(e) = app_state.session.login(token, app_state.http_client.as_ref()).await {
        warn!("Startup login failed, waiting for a login on the local API: {}", e);
    }
}

fn init_session_watch_worker(
    app_state: &AppState,
    options: session_watch::Options,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), AgentError> {
    info!("Initializing session watch worker...");

    let session = app_state.session.clone();
    let handle = tokio::spawn(async move {
        session_watch::run(
            &options,
            session.as_ref(),
            tokio::time::sleep,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    });

    shutdown_manager.with_worker_handle("session-watch", handle)
}

fn init_poller_worker(
    target: Arc<dyn PollTarget>,
    options: poller::Options,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), AgentError> {
    let name = target.name();
    info!("Initializing {} poller...", name);

    let handle = tokio::spawn(async move {
        poller::run(
            &options,
            target.as_ref(),
            tokio::time::sleep,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    });

    shutdown_manager.with_worker_handle(name, handle)
}

async fn init_server(
    options: &AppOptions,
    app_state: &AppState,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), AgentError> {
    info!("Initializing local HTTP server...");

    let backend: Arc<dyn BackendApi> = app_state.http_client.clone();
    let validator: Arc<dyn SessionValidator> = app_state.http_client.clone();
    let server_state = ServerState::new(
        app_state.store.clone(),
        app_state.session.clone(),
        app_state.feeds.clone(),
        backend,
        validator,
    );

    let server_handle = serve(&options.server, Arc::new(server_state), async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    shutdown_manager.with_server_handle(server_handle)
}

// ================================= SHUTDOWN ===================================== //

struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    lifecycle_options: LifecycleOptions,
    worker_handles: Vec<(&'static str, JoinHandle<()>)>,
    server_handle: Option<JoinHandle<Result<(), AgentError>>>,
}

impl ShutdownManager {
    pub fn new(shutdown_tx: broadcast::Sender<()>, lifecycle_options: LifecycleOptions) -> Self {
        Self {
            shutdown_tx,
            lifecycle_options,
            worker_handles: Vec::new(),
            server_handle: None,
        }
    }

    pub fn with_worker_handle(
        &mut self,
        name: &'static str,
        handle: JoinHandle<()>,
    ) -> Result<(), AgentError> {
        if self.worker_handles.iter().any(|(existing, _)| *existing == name) {
            return Err(AgentError::ShutdownError(format!("{} handle already set", name)));
        }
        self.worker_handles.push((name, handle));
        Ok(())
    }

    pub fn with_server_handle(
        &mut self,
        handle: JoinHandle<Result<(), AgentError>>,
    ) -> Result<(), AgentError> {
        if self.server_handle.is_some() {
            return Err(AgentError::ShutdownError("server_handle already set".to_string()));
        }
        self.server_handle = Some(handle);
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), AgentError> {
        let _ = self.shutdown_tx.send(());

        match tokio::time::timeout(
            self.lifecycle_options.max_shutdown_delay,
            self.shutdown_impl(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Shutdown timed out after {:?}, forcing shutdown...",
                    self.lifecycle_options.max_shutdown_delay
                );
                std::process::exit(1);
            }
        }
    }

    async fn shutdown_impl(&mut self) -> Result<(), AgentError> {
        info!("Shutting down cloudpulse...");

        // 1. Workers
        let handles = std::mem::take(&mut self.worker_handles);
        let (names, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        for (name, result) in names.into_iter().zip(futures::future::join_all(handles).await) {
            result.map_err(|e| AgentError::ShutdownError(format!("{}: {}", name, e)))?;
        }

        // 2. Local server
        if let Some(handle) = self.server_handle.take() {
            handle.await.map_err(|e| AgentError::ShutdownError(e.to_string()))??;
        }

        info!("Shutdown complete");
        Ok(())
    }
}
