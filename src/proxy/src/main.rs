use std::time::Duration;

use clap::Parser;
use proxy::cli_args::ProxyArgs;
use proxy::{app, AppState};
use tracing::info;

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("proxy received ctrl_c, shutting down"),
        _ = terminate => info!("proxy received terminate signal, shutting down"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ProxyArgs::parse();
    gateway_common::logging::init(&args.log_level());

    let directory = args.resolve_directory()?;
    info!(
        primary = %directory.primary,
        replicas = ?directory.replicas,
        port = args.port,
        "proxy starting"
    );

    let state = AppState::new(
        directory,
        Duration::from_secs(args.upstream_timeout_secs),
        args.ping_timeout(),
    );
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
