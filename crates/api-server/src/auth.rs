//! Session middleware: builds the advertising API [`SessionContext`] from
//! request headers and attaches it as a request extension.

use crate::rest::AppState;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use launch_core::{LaunchError, SessionContext};
use launch_gateway::transport::CLIENT_ID_HEADER;
use serde_json::json;
use tracing::warn;

/// Bearer token from `Authorization`, client id from the client-id header or
/// the configured fallback. `None` when either is missing or blank.
pub fn session_from_headers(
    headers: &HeaderMap,
    default_client_id: Option<&str>,
) -> Option<SessionContext> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())?;

    let client_id = headers
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or(default_client_id)
        .filter(|c| !c.is_empty())?;

    Some(SessionContext::new(client_id, token))
}

/// Rejects requests without a session before they reach the pipeline.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match session_from_headers(req.headers(), state.default_client_id.as_deref()) {
        Some(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        None => {
            warn!(path = %req.uri().path(), "Request without advertising API session");
            metrics::counter!("api.unauthenticated").increment(1);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": LaunchError::NotAuthenticated.to_string() })),
            )
                .into_response()
        }
    }
}
