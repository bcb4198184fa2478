//! Diagnostic report for `--diagnostic`

use colored::Colorize;

use crate::authn::session_token::SessionToken;
use crate::http::client::HttpClient;
use crate::notify::store::rehydrate;
use crate::storage::layout::StorageLayout;
use crate::storage::local::{LocalStorage, NOTIFICATIONS_KEY};
use crate::storage::settings::Settings;
use crate::utils::version_info;

enum Check {
    Pass(String),
    Warn(String),
    Fail(String),
}

fn print_check(name: &str, check: Check) {
    let (label, detail) = match check {
        Check::Pass(detail) => ("PASS".green().bold(), detail),
        Check::Warn(detail) => ("WARN".yellow().bold(), detail),
        Check::Fail(detail) => ("FAIL".red().bold(), detail),
    };
    println!("  [{}] {:<24} {}", label, name, detail);
}

/// Print a health report of the local installation and backend reachability
pub async fn run_diagnostic(layout: &StorageLayout, token_override: Option<&str>) {
    let version = version_info();
    println!(
        "{} {} ({}, built {})",
        "cloudpulse".bold(),
        version.version,
        version.git_hash,
        version.build_time
    );
    println!("  data directory: {}", layout.base_dir.display());
    println!();

    // Settings
    let settings_file = layout.settings_file();
    let settings = if !settings_file.exists().await {
        print_check("settings", Check::Warn("not found, using defaults".to_string()));
        Settings::default()
    } else {
        match settings_file.read_json::<Settings>().await {
            Ok(settings) => {
                print_check("settings", Check::Pass(settings_file.path().display().to_string()));
                settings
            }
            Err(e) => {
                print_check("settings", Check::Fail(e.to_string()));
                Settings::default()
            }
        }
    };
    match settings.validate() {
        Ok(()) => print_check("settings values", Check::Pass("valid".to_string())),
        Err(e) => print_check("settings values", Check::Fail(e.to_string())),
    }

    // Data directory
    let state_dir = layout.state_dir();
    if state_dir.is_writable().await {
        print_check("state directory", Check::Pass("writable".to_string()));
    } else {
        print_check(
            "state directory",
            Check::Fail(format!("{} is not writable", state_dir.path().display())),
        );
    }

    // Persisted notifications
    let storage = LocalStorage::new(state_dir);
    match storage.get(NOTIFICATIONS_KEY).await {
        Ok(None) => print_check("notifications", Check::Pass("none persisted".to_string())),
        Ok(Some(blob)) => {
            let rehydrated = rehydrate(&blob, settings.notification_capacity.max(1));
            let detail = format!(
                "{} loaded, {} dropped",
                rehydrated.notifications.len(),
                rehydrated.dropped
            );
            if rehydrated.dropped > 0 {
                print_check("notifications", Check::Warn(detail));
            } else {
                print_check("notifications", Check::Pass(detail));
            }
        }
        Err(e) => print_check("notifications", Check::Fail(e.to_string())),
    }

    // Backend
    let timeout = std::time::Duration::from_secs(settings.backend.request_timeout_secs.clamp(1, 10));
    match HttpClient::new(&settings.backend.base_url, timeout) {
        Ok(client) => match client.health().await {
            Ok(health) => print_check(
                "backend",
                Check::Pass(format!("{} ({})", client.base_url(), health.status)),
            ),
            Err(e) => print_check("backend", Check::Fail(format!("{}: {}", client.base_url(), e))),
        },
        Err(e) => print_check("backend", Check::Fail(e.to_string())),
    }

    // Token
    let raw = token_override.map(str::to_string).or(settings.auth.token);
    match raw.as_deref().map(SessionToken::from_raw) {
        None => print_check("token", Check::Warn("not configured".to_string())),
        Some(Err(e)) => print_check("token", Check::Fail(e.to_string())),
        Some(Ok(token)) if token.is_expired() => {
            print_check("token", Check::Fail("expired".to_string()))
        }
        Some(Ok(token)) => match token.expires_at() {
            Some(exp) => print_check("token", Check::Pass(format!("valid until {}", exp))),
            None => print_check("token", Check::Pass("opaque, no expiry".to_string())),
        },
    }
}
