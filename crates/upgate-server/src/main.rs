use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use upgate_core::tracing_init::init_tracing;
use upgate_server::{AppState, Args, ServerConfig, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing("upgate_server=info,tower_http=info", args.log_json);

    let config = ServerConfig::from_args(args).context("Refusing to start")?;
    let state = Arc::new(AppState::from_config(&config).context("Invalid update policy")?);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.addr,
        min_version_android = %config.engine.android.min_version,
        min_version_ios = %config.engine.ios.min_version,
        version_parsing = ?config.engine.version_parsing,
        rate_limit = ?config.rate_limit,
        "Starting upgate-server"
    );

    let app = build_router(state, config.rate_limit.as_ref());
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("upgate-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}
