//! HTTP server command implementation.

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tokio::signal;
use tracing::{info, warn};

use xerophagon::build_info::BuildInfo;
use xerophagon::server::{self, ServerLimits, ServerState};
use xerophagon::views::Views;

pub async fn run(
    config_path: &str,
    host_override: Option<IpAddr>,
    port_override: Option<u16>,
    data_override: Option<&Path>,
) -> Result<()> {
    let (mut config, tracker) = super::open_tracker(config_path, data_override).await?;

    // CLI overrides config
    if let Some(host) = host_override {
        config.server.host = host.to_string();
    }
    if let Some(port) = port_override {
        config.server.port = port;
    }

    // Surface a corrupt data file at startup rather than on the first request
    let snapshot = match tracker.snapshot().await {
        Ok(s) => s,
        Err(e) if e.is_malformed() => {
            bail!("{e}; fix or move the data file before starting the server")
        }
        Err(e) => return Err(e).context("Failed to load fasting data"),
    };
    info!(
        status = ?snapshot.status(),
        completed = snapshot.fasting_history.len(),
        "Loaded fasting data"
    );

    let views = Views::new().context("Failed to load page templates")?;

    let state = ServerState {
        tracker,
        views,
        page_size: config.history.page_size.max(1),
    };
    let limits = ServerLimits {
        request_timeout_seconds: config.server.request_timeout_seconds,
        max_connections: config.server.max_connections.max(1),
    };
    let app = server::build_app(state, limits);

    let ip: IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server host '{}'", config.server.host))?;
    let addr = SocketAddr::new(ip, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(addr = %addr, build = %BuildInfo::current(), "Starting server");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
