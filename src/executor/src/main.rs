use clap::Parser;
use executor::cli_args::ExecutorArgs;
use executor::{app, AppState};
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
        _ = ctrl_c => info!("executor received ctrl_c, shutting down"),
        _ = terminate => info!("executor received terminate signal, shutting down"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ExecutorArgs::parse();
    gateway_common::logging::init(&args.log_level());

    info!(db_host = %args.db_host, db_name = %args.db_name, port = args.port, "executor starting");

    let state = AppState::new(args.db_opts());
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
