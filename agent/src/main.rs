//! cloudpulse - Entry Point
//!
//! Keeps the dashboard's notification list and activity timeline in sync with
//! the orchestrator backend and serves them on a loopback HTTP API.

use std::collections::HashMap;
use std::env;

use cloudpulse::app::diagnostic::run_diagnostic;
use cloudpulse::app::options::AppOptions;
use cloudpulse::app::run::run;
use cloudpulse::logs::{init_logging, LogLevel, LogOptions};
use cloudpulse::storage::layout::StorageLayout;
use cloudpulse::storage::settings::Settings;
use cloudpulse::utils::version_info;

use tracing::{error, info, warn};

const TOKEN_ENV: &str = "CLOUDPULSE_TOKEN";

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{}", version.version),
        }
        return;
    }

    let layout = match cli_args.get("data-dir") {
        Some(dir) => StorageLayout::new(dir),
        None => StorageLayout::default(),
    };
    let token_override = cli_args
        .get("token")
        .cloned()
        .or_else(|| env::var(TOKEN_ENV).ok())
        .filter(|token| !token.trim().is_empty());

    // Run diagnostics
    if cli_args.contains_key("diagnostic") || cli_args.contains_key("diag") {
        run_diagnostic(&layout, token_override.as_deref()).await;
        return;
    }

    // Retrieve the settings file
    let settings_file = layout.settings_file();
    let mut settings = if settings_file.exists().await {
        match settings_file.read_json::<Settings>().await {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Unable to read settings file: {e}");
                return;
            }
        }
    } else {
        Settings::default()
    };
    if let Some(level) = cli_args.get("log-level") {
        match level.parse::<LogLevel>() {
            Ok(level) => settings.log_level = level,
            Err(e) => eprintln!("Ignoring --log-level: {e}"),
        }
    }
    if token_override.is_some() {
        settings.auth.token = token_override;
    }
    if let Err(e) = settings.validate() {
        eprintln!("Invalid settings: {e}");
        return;
    }

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        json_format: settings.log_json,
        log_dir: settings
            .log_to_file
            .then(|| layout.logs_dir().path().to_path_buf()),
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            println!("Failed to initialize logging: {e}");
            None
        }
    };
    if !settings_file.exists().await {
        warn!("No settings file at {}, using defaults", settings_file.path().display());
    }

    // Run the agent
    let options = AppOptions::from_settings(&settings, layout);
    info!(
        "Running cloudpulse {} against {}",
        version.version, options.backend_base_url
    );
    if let Err(e) = run(options, await_shutdown_signal()).await {
        error!("Failed to run cloudpulse: {e}");
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                _ => {
                    warn!("Unable to install signal handlers, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            return;
        }
        info!("Ctrl+C received, shutting down...");
    }
}
