// SPDX-License-Identifier: GPL-3.0-only
use axum::Json;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::store::MirrorError;
use crate::sync::SyncOrchestrator;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub last_update: DateTime<Utc>,
    pub next_update: DateTime<Utc>,
    pub updating: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

pub struct ApiHandlers {
    orchestrator: Arc<SyncOrchestrator>,
}

impl ApiHandlers {
    pub fn new(orchestrator: Arc<SyncOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub async fn status(&self) -> Json<ApiResponse<StatusResponse>> {
        Json(ApiResponse::success(StatusResponse {
            last_update: self.orchestrator.last_update(),
            next_update: self.orchestrator.next_update(),
            updating: self.orchestrator.is_updating(),
        }))
    }

    pub async fn trigger_update(&self) -> Result<Json<ApiResponse<&'static str>>, StatusCode> {
        info!("Manual update requested");
        self.finish(self.orchestrator.manual_update().await, "updated")
    }

    pub async fn trigger_full_rebuild(
        &self,
    ) -> Result<Json<ApiResponse<&'static str>>, StatusCode> {
        info!("Full rebuild requested");
        self.finish(self.orchestrator.hard_reset_update().await, "rebuilt")
    }

    fn finish(
        &self,
        result: Result<(), MirrorError>,
        message: &'static str,
    ) -> Result<Json<ApiResponse<&'static str>>, StatusCode> {
        match result {
            Ok(()) => Ok(Json(ApiResponse::success(message))),
            Err(e) => {
                if e.is_busy() {
                    warn!("Update request dropped, another run is active");
                } else {
                    error!(error = %e, "Requested update failed");
                }
                Err(error_status(&e))
            }
        }
    }
}

fn error_status(error: &MirrorError) -> StatusCode {
    if error.is_busy() {
        StatusCode::CONFLICT
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
