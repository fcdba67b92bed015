//! OpenAPI specification and Swagger UI configuration.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campaign Launch API",
        version = "0.1.0",
        description = "Launches Sponsored Products campaigns with one exact-match keyword each.\n\nRequests carry the advertising API bearer token and client id; every launch reports per-stage progress.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Campaigns", description = "Single-keyword campaign launches"),
        (name = "Operations", description = "Health, readiness, and liveness probes"),
    ),
    paths(
        crate::rest::launch_campaign,
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
    ),
    components(schemas(
        launch_core::types::CampaignRequest,
        launch_core::types::BiddingSpec,
        launch_core::types::BidAdjustment,
        launch_core::types::InitialBidPolicy,
        launch_core::types::StageStatus,
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
    ))
)]
pub struct ApiDoc;
