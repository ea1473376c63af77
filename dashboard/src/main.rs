//! Headless dashboard runner: starts the client core against the configured
//! gateway and logs everything it observes until Ctrl-C.

use dashboard::app::tasks::status::StatusSnapshot;
use dashboard::core::config::DashboardConfig;
use dashboard::{debug, AppEvent, Dashboard};
use lib_utils::get_env;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();
    let _log_guard = debug::init_logger();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Dashboard exited with error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> dashboard::Result<()> {
    let config = DashboardConfig::from_env()?;
    let mut dashboard = Dashboard::new(config)?;

    if let (Ok(username), Ok(password)) = (get_env("DASHBOARD_USERNAME"), get_env("DASHBOARD_PASSWORD")) {
        match dashboard.login(&username, &password).await {
            Ok(_) => tracing::info!(username = %username, "Signed in"),
            Err(e) => tracing::warn!(username = %username, error = %e, "Sign-in failed"),
        }
    } else if !dashboard.api().session().is_authenticated() {
        tracing::info!("No session; set DASHBOARD_USERNAME and DASHBOARD_PASSWORD to sign in");
    }

    dashboard.start();
    let events = dashboard.events();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("Ctrl-C received, shutting down");
                break;
            }
            event = events.recv() => {
                let Ok(event) = event else { break };
                log_event(&event);
                dashboard.handle_event(&event);
            }
        }
    }

    dashboard.shutdown().await;
    Ok(())
}

fn log_event(event: &AppEvent) {
    match event {
        AppEvent::SessionExpired => tracing::warn!("Session expired"),
        AppEvent::ServiceStatusUpdated(snapshot) => log_status(snapshot),
        AppEvent::NotificationReceived(n) => {
            tracing::info!(kind = ?n.kind, at = %n.time_label(), "{}", n.message);
        }
    }
}

fn log_status(snapshot: &StatusSnapshot) {
    for service in &snapshot.services {
        tracing::info!(
            version = snapshot.version,
            service = %service.name,
            port = service.port,
            status = %service.status,
            "Service status"
        );
    }
}
