//! End-to-end launch over the real HTTP transport against a mocked
//! advertising API.

use launch_core::config::AdsApiConfig;
use launch_core::types::CampaignRequest;
use launch_core::SessionContext;
use launch_gateway::{AdsGateway, HttpTransport};
use launch_pipeline::CampaignOrchestrator;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_request() -> CampaignRequest {
    serde_json::from_value(json!({
        "profile_id": "42",
        "asin": "B000TEST01",
        "sku": "",
        "daily_budget": 25,
        "campaign_start_date": "2024-05-01",
        "campaign_end_date": "2024-06-30",
        "enabled": false,
        "bidding": {
            "strategy": "legacyForSales",
            "adjustments": [{"predicate": "placementProductPage", "percentage": 20}]
        },
        "keywords": "shoe,boot",
        "acostarget": "30",
        "default_bid": "0.45",
        "max_bid": "3",
        "bid_adjustment": "0",
        "initial_keyword_bid": "higher"
    }))
    .unwrap()
}

async fn mount(
    server: &MockServer,
    http_method: &str,
    route: &str,
    status: u16,
    body: serde_json::Value,
) {
    Mock::given(method(http_method))
        .and(path(route))
        .and(header("Amazon-Advertising-API-Scope", "42"))
        .and(header("Authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

fn orchestrator_for(server: &MockServer) -> CampaignOrchestrator {
    let transport = HttpTransport::new(&AdsApiConfig {
        base_url: server.uri(),
        timeout_ms: 2_000,
        client_id: None,
    })
    .unwrap();
    CampaignOrchestrator::new(AdsGateway::new(Arc::new(transport)))
}

#[tokio::test]
async fn test_full_launch_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/campaigns"))
        .and(body_partial_json(json!([
            {"name": "B000TEST01 - SPKW_SKW - P_PP - T30 - shoe", "state": "paused",
             "startDate": "20240501", "endDate": "20240630"}
        ])))
        .respond_with(ResponseTemplate::new(207).set_body_json(json!([
            {"code": "SUCCESS", "campaignId": 10},
            {"code": "SUCCESS", "campaignId": 11}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount(
        &server,
        "POST",
        "/v2/sp/adGroups",
        207,
        json!([{"code": "SUCCESS", "adGroupId": 20}, {"code": "SUCCESS", "adGroupId": 21}]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/v2/sp/productAds"))
        .and(body_partial_json(json!([{"asin": "B000TEST01", "adGroupId": 20}])))
        .respond_with(ResponseTemplate::new(207).set_body_json(json!([
            {"code": "SUCCESS", "adId": 30},
            {"code": "SUCCESS", "adId": 31}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount(
        &server,
        "POST",
        "/v2/sp/keywords/bidRecommendations",
        207,
        json!({
            "adGroupId": 20,
            "recommendations": [
                {"code": "SUCCESS", "keyword": "shoe",
                 "suggestedBid": {"suggested": 1.0, "rangeStart": 0.5, "rangeEnd": 2.5}},
                {"code": "SUCCESS", "keyword": "boot",
                 "suggestedBid": {"suggested": 2.0, "rangeStart": 1.0, "rangeEnd": 3.5}}
            ]
        }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/v2/sp/keywords"))
        .and(body_partial_json(json!([
            {"keywordText": "shoe", "bid": 2.5, "matchType": "exact"},
            {"keywordText": "boot", "bid": 0.45}
        ])))
        .respond_with(ResponseTemplate::new(207).set_body_json(json!([
            {"code": "SUCCESS", "keywordId": 40},
            {"code": "SUCCESS", "keywordId": 41}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let status = orchestrator_for(&server)
        .launch(&SessionContext::new("client-1", "token-1"), &sample_request())
        .await
        .unwrap();

    assert!(status.success);
    assert_eq!(status.message, "All campaigns are successfully created!");
}

#[tokio::test]
async fn test_rejected_campaign_batch_stops_the_launch() {
    let server = MockServer::start().await;
    mount(
        &server,
        "POST",
        "/v2/campaigns",
        401,
        json!({"code": "UNAUTHORIZED", "details": "Not authorized to access scope"}),
    )
    .await;

    let status = orchestrator_for(&server)
        .launch(&SessionContext::new("client-1", "token-1"), &sample_request())
        .await
        .unwrap();

    assert!(!status.success);
    assert!(!status.campaign_created);
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}
