//! API server: the launch REST endpoint, probes, and the metrics exporter.

use crate::auth;
use crate::rest::{self, AppState};
use crate::swagger::ApiDoc;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use launch_core::config::AppConfig;
use launch_pipeline::CampaignOrchestrator;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Launch endpoints sit behind the session middleware; probes and docs do not.
pub fn router(state: AppState) -> Router {
    let launch = Router::new()
        .route("/single_keyword_campaign/", post(rest::launch_campaign))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::session_middleware,
        ));

    Router::new()
        .merge(launch)
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub struct ApiServer {
    config: AppConfig,
    orchestrator: Arc<CampaignOrchestrator>,
}

impl ApiServer {
    pub fn new(config: AppConfig, orchestrator: Arc<CampaignOrchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    fn state(&self) -> AppState {
        AppState {
            orchestrator: self.orchestrator.clone(),
            node_id: self.config.node_id.clone(),
            start_time: Instant::now(),
            default_client_id: self.config.ads.client_id.clone(),
        }
    }

    /// Start the HTTP REST server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = router(self.state());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Recorder must outlive the process.
        std::mem::forget(handle);
        Ok(())
    }
}
