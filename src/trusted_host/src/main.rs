use std::time::Duration;

use clap::Parser;
use tracing::info;
use trusted_host::cli_args::TrustedHostArgs;
use trusted_host::{app, AppState};

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
        _ = ctrl_c => info!("trusted_host received ctrl_c, shutting down"),
        _ = terminate => info!("trusted_host received terminate signal, shutting down"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = TrustedHostArgs::parse();
    gateway_common::logging::init(&args.log_level());

    let proxy_url = args.resolve_proxy()?;
    info!(%proxy_url, port = args.port, "trusted_host starting");

    let state = AppState::new(proxy_url, Duration::from_secs(args.upstream_timeout_secs));
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
