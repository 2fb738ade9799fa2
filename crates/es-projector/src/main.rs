//! ES Projector CLI

use clap::Parser;
use es_projector::{
    coordinator::BatchCoordinator,
    dispatcher::ChangeDispatcher,
    endpoints::EndpointRegistry,
    es_client::EsClient,
    health::ClusterHealthProbe,
    retry::RetryPolicy,
    server::{self, AppState},
};
use projector_core::prelude::*;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "es-projector")]
#[command(about = "Projects change-capture batches into tenant-scoped Elasticsearch indices")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(long, env = "ES_PROJECTOR_CONFIG")]
    config: Option<String>,

    /// Listen address override for the trigger API
    #[arg(long, env = "LISTEN")]
    listen: Option<String>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = ProjectorConfig::load(args.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    if config.observability.log_format == "pretty" {
        tracing_subscriber::registry().with(fmt::layer()).with(filter).init();
    } else {
        tracing_subscriber::registry().with(fmt::layer().json()).with(filter).init();
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting es-projector");

    let registry = EndpointRegistry::from_env();
    info!(tenants = registry.len(), "Endpoint registry initialized");

    let retry = RetryPolicy::from(&config.retry);
    let client = EsClient::new(&config.elasticsearch, retry)?;
    let probe = ClusterHealthProbe::new(client.http_client(), config.elasticsearch.health_timeout);
    let dispatcher = ChangeDispatcher::new(registry, probe, client);
    let coordinator = Arc::new(BatchCoordinator::new(dispatcher));

    let listen = args.listen.unwrap_or(config.server.listen);
    let app = server::router(AppState { coordinator });
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!(listen, "Trigger API started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Projector stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
