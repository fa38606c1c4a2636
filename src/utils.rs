//! Utility functions.

use time::macros::format_description;
use time::OffsetDateTime;
use tracing::info;

use crate::error::Result;

/// Current UTC time as an ISO-8601 string.
pub fn iso_timestamp() -> Result<String> {
    format_iso(OffsetDateTime::now_utc())
}

/// Format a UTC instant as an ISO-8601 string with milliseconds,
/// e.g. `2024-05-01T12:00:00.123Z`.
pub fn format_iso(at: OffsetDateTime) -> Result<String> {
    let iso_millis = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    Ok(at.format(iso_millis)?)
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
