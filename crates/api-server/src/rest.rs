//! REST API handlers for campaign launches and operational endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use launch_core::types::{CampaignRequest, StageStatus};
use launch_core::{LaunchError, SessionContext};
use launch_pipeline::CampaignOrchestrator;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, warn};
use utoipa::ToSchema;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<CampaignOrchestrator>,
    pub node_id: String,
    pub start_time: Instant,
    /// Client id used when the caller does not send one.
    pub default_client_id: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn invalid_request(message: String) -> ApiError {
    metrics::counter!("api.validation_errors").increment(1);
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: "invalid_request".to_string(),
            message,
        }),
    )
}

/// POST /single_keyword_campaign/: launch one campaign per keyword.
#[utoipa::path(
    post,
    path = "/single_keyword_campaign/",
    tag = "Campaigns",
    request_body = CampaignRequest,
    responses(
        (status = 200, description = "Launch processed; see flags and message", body = StageStatus),
        (status = 400, description = "Malformed or invalid request", body = ErrorResponse),
        (status = 401, description = "No advertising API session"),
        (
            status = 502,
            description = "Advertising API unreachable or undecodable",
            body = ErrorResponse
        ),
    )
)]
pub async fn launch_campaign(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    payload: Result<Json<CampaignRequest>, JsonRejection>,
) -> Result<Json<StageStatus>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Campaign request rejected");
        invalid_request(rejection.body_text())
    })?;

    if let Err(e) = request.validate() {
        warn!(profile_id = %request.profile_id, error = %e, "Campaign request validation failed");
        return Err(invalid_request(e.to_string()));
    }

    match state.orchestrator.launch(&session, &request).await {
        Ok(status) => Ok(Json(status)),
        Err(LaunchError::Validation(msg)) => Err(invalid_request(msg)),
        Err(e) => {
            error!(error = %e, profile_id = %request.profile_id, "Campaign launch failed");
            metrics::counter!("api.errors").increment(1);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "upstream_failure".to_string(),
                    message: e.to_string(),
                }),
            ))
        }
    }
}

/// GET /health: health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready: readiness probe.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Operations",
    responses((status = 200, description = "Ready to accept traffic"))
)]
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live: liveness probe.
#[utoipa::path(
    get,
    path = "/live",
    tag = "Operations",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}
