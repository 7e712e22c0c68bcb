use std::sync::Arc;

use tokio::net::TcpListener;

use cwl_ledger::InMemoryLedgerStore;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// ChainWallet Ledger server.
pub struct CwlServer {
    config: ServerConfig,
    state: AppState,
}

impl CwlServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            state: AppState::new(Arc::new(InMemoryLedgerStore::new())),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = build_router(self.state);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("CWL server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
