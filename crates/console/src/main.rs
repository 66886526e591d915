mod cli;
mod config;
mod logging;
mod routes;
mod state;

use crate::cli::Args;
use crate::config::{load_console_config, resolve_api_key};
use crate::logging::init_tracing;
use crate::routes::build_router;
use crate::state::{AppState, SharedClient};
use anyhow::Context;
use clap::Parser;
use risk_client::{GeminiTransport, ModelTransport, RiskClientSettings, RouteRiskClient};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(&args)?;

    info!(
        listen_addr = %args.listen_addr,
        config = %args.config.display(),
        "console starting"
    );
    let config = load_console_config(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    let model = config.model;
    let api_key = resolve_api_key(&model, |name| std::env::var(name).ok());
    match api_key.as_ref() {
        Some(key) => info!(
            api_key_env = %model.api_key_env,
            api_key_len = key.len(),
            "model credential loaded"
        ),
        None => tracing::warn!(
            api_key_env = %model.api_key_env,
            "model credential missing, analyses will be refused"
        ),
    }
    let transport: Arc<dyn ModelTransport> =
        Arc::new(GeminiTransport::new(model.base_url.clone(), model.timeout_ms));
    let client: SharedClient = Arc::new(RouteRiskClient::new(
        RiskClientSettings {
            api_key,
            model: model.model.clone(),
        },
        transport,
    ));
    info!(
        base_url = %model.base_url,
        model = %client.model(),
        timeout_ms = ?model.timeout_ms,
        "model configured"
    );
    let app = build_router(AppState::new(client));

    let shutdown = CancellationToken::new();
    let listener = TcpListener::bind(&args.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", args.listen_addr))?;
    info!(addr = %args.listen_addr, "console listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown.clone()))
        .await?;
    info!("console shutting down");
    Ok(())
}

async fn wait_for_shutdown(shutdown: CancellationToken) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
        _ = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}
