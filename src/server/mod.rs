//! Web server exposing the registry overview

pub mod handlers;
pub mod render;

use crate::config::{AppConfig, PipelineConfig};
use crate::error::Result;
use crate::registry::{RegistryApi, RegistryClient};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared, read-only state of every request
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn RegistryApi>,
    pub pipeline: PipelineConfig,
}

impl AppState {
    pub fn new(registry: Arc<dyn RegistryApi>, pipeline: PipelineConfig) -> Self {
        Self { registry, pipeline }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/images", get(handlers::images))
        .route("/delete", get(handlers::delete).post(handlers::delete))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Bind the configured address and serve until interrupted.
///
/// Failing to build the client or to bind is returned to the caller.
pub async fn serve(config: AppConfig) -> Result<()> {
    let client = RegistryClient::new(config.registry.as_str(), config.skip_tls)?;
    tracing::info!(
        "Reading registry {} at {}",
        config.registry,
        client.base_url()
    );

    let state = AppState::new(Arc::new(client), config.pipeline.clone());
    let listener = TcpListener::bind(&config.listen).await?;
    tracing::info!("Listening on {}...", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
