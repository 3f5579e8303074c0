// SPDX-License-Identifier: GPL-3.0-only
use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::api::handlers::{ApiHandlers, ApiResponse, StatusResponse};
use crate::sync::SyncOrchestrator;

pub struct HttpServer {
    handlers: ApiHandlers,
    addr: SocketAddr,
}

impl HttpServer {
    pub fn new(orchestrator: Arc<SyncOrchestrator>, addr: SocketAddr) -> Self {
        Self {
            handlers: ApiHandlers::new(orchestrator),
            addr,
        }
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let handlers = Arc::new(self.handlers);

        let app = Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/update", post(update_handler))
            .route("/api/update/full", post(full_rebuild_handler))
            .with_state(handlers);

        info!(addr = %self.addr, "Starting operator API server");

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status_handler(
    axum::extract::State(handlers): axum::extract::State<Arc<ApiHandlers>>,
) -> Json<ApiResponse<StatusResponse>> {
    handlers.status().await
}

async fn update_handler(
    axum::extract::State(handlers): axum::extract::State<Arc<ApiHandlers>>,
) -> Result<Json<ApiResponse<&'static str>>, StatusCode> {
    handlers.trigger_update().await
}

async fn full_rebuild_handler(
    axum::extract::State(handlers): axum::extract::State<Arc<ApiHandlers>>,
) -> Result<Json<ApiResponse<&'static str>>, StatusCode> {
    handlers.trigger_full_rebuild().await
}
