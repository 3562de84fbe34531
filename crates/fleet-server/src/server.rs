use std::sync::Arc;

use fleet_store::{FleetStore, InMemoryFleetStore};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::postcode::{AcceptAllPostcodes, PostcodeValidator, PostcodesIoValidator};
use crate::router::build_router;
use crate::state::AppState;

/// Fleet custody server.
pub struct FleetServer {
    config: ServerConfig,
}

impl FleetServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The postcode validator selected by the configuration.
    pub fn postcode_validator(&self) -> ServerResult<Arc<dyn PostcodeValidator>> {
        if self.config.postcode.enabled {
            Ok(Arc::new(PostcodesIoValidator::new(&self.config.postcode)?))
        } else {
            tracing::warn!("postcode validation disabled; all postcodes accepted");
            Ok(Arc::new(AcceptAllPostcodes))
        }
    }

    /// Build the router over `store` (useful for testing).
    pub fn router<S: FleetStore + 'static>(&self, store: Arc<S>) -> ServerResult<axum::Router> {
        let state = AppState::new(store, self.postcode_validator()?, self.config.clone());
        Ok(build_router(state))
    }

    /// Start serving requests from a fresh in-memory store.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router(Arc::new(InMemoryFleetStore::new()))?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("fleet server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
