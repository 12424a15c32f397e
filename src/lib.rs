//! CodeSage Dashboard - browser dashboard for code-review statistics.
//!
//! Polls the CodeSage review backend and serves a rendered dashboard page.
//! When the backend cannot be reached the dashboard shows a fixed
//! demonstration dataset instead of an error.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod view;

use config::DashboardConfig;
use error::AppError;
use services::dashboard_server::start_dashboard_server;

/// Run the dashboard until Ctrl-C.
pub async fn run() -> Result<(), AppError> {
    let config = DashboardConfig::from_env()?;
    log::info!(
        "[server] Starting dashboard (poll every {}s, failure policy {:?})",
        config.poll_interval_secs,
        config.failure_policy
    );

    let server = start_dashboard_server(&config).await?;

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown signal: {}", e)))?;

    server.shutdown().await;
    Ok(())
}
