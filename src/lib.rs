//! # Positions
//!
//! Serves vehicle position records fetched from a third-party API through a
//! same-origin gateway, plus a server-side rendering of the filtered, sorted
//! position table.

pub mod config;
pub mod http;
pub mod provider;

use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use position_gateway::{Gateway, Upstream};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

pub use crate::http::{AppState, router};
pub use crate::provider::Provider;

/// Load configuration, bind the listener and serve until shutdown.
///
/// # Errors
///
/// Returns an error when the upstream configuration is incomplete, the port
/// cannot be bound or the server fails.
pub async fn serve() -> Result<()> {
    let provider = Provider::new();
    let upstream = Upstream::from_config(&provider).await.context("loading upstream config")?;
    info!(upstream = ?upstream, "upstream configured");

    let state = AppState {
        gateway: Gateway::new(upstream, provider),
        zone: config::get_display_timezone(),
    };
    let app = router(state);

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config::get_port()));
    let listener = TcpListener::bind(address).await.with_context(|| format!("binding {address}"))?;
    info!("positions gateway listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
