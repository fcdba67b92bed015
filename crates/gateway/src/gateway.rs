//! Advertising API gateway. One bulk call per entity batch.
//!
//! Every create call answers either `TotalFailure` (the bulk status was not
//! 207 multi-status) or `Partial` with one [`RowOutcome`] per input record,
//! positionally aligned. Transport and decoding errors are not caught here.

use crate::transport::{AdsTransport, ApiRequest, HttpMethod};
use crate::wire::{
    AdGroupBidRecommendation, AdGroupRecord, AdGroupWire, BidRecommendation, BulkItemResponse,
    CampaignRecord, CampaignWire, KeywordBidRecommendationRequest,
    KeywordBidRecommendationResponse, KeywordMatch, KeywordRecord, KeywordWire, ProductAdRecord,
    ProductAdWire, ProductTargetRecord, ProductTargetSummary, ProductTargetWire,
    TargetBidRecommendation, TargetBidRecommendationRequest, TargetBidRecommendationResponse,
    TargetExpression, TargetUpdateWire,
};
use launch_core::types::{EntityState, RowOutcome, SUCCESS_CODE};
use launch_core::{LaunchResult, SessionContext};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Status of a processed bulk batch with per-item outcomes.
pub const MULTI_STATUS: u16 = 207;
pub const OK: u16 = 200;

/// Auto-targeting predicates, in the order they are paired with ad groups.
pub const AUTO_TARGET_PREDICATES: [&str; 4] = [
    "queryHighRelMatches",
    "queryBroadRelMatches",
    "querySubstituteRelated",
    "asinAccessoryRelated",
];

/// Result of a bulk create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome {
    /// The batch was rejected as a whole.
    TotalFailure { status: u16 },
    /// The batch was processed; one outcome per submitted record.
    Partial(Vec<RowOutcome>),
}

impl BulkOutcome {
    pub fn into_rows(self) -> Option<Vec<RowOutcome>> {
        match self {
            BulkOutcome::Partial(rows) => Some(rows),
            BulkOutcome::TotalFailure { .. } => None,
        }
    }
}

/// Remote entity families that support bulk creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Campaign,
    AdGroup,
    ProductAd,
    Keyword,
    NegativeKeyword,
    ProductTarget,
    NegativeProductTarget,
}

impl EntityKind {
    pub fn path(&self) -> &'static str {
        match self {
            EntityKind::Campaign => "/v2/campaigns",
            EntityKind::AdGroup => "/v2/sp/adGroups",
            EntityKind::ProductAd => "/v2/sp/productAds",
            EntityKind::Keyword => "/v2/sp/keywords",
            EntityKind::NegativeKeyword => "/v2/sp/negativeKeywords",
            EntityKind::ProductTarget => "/v2/sp/targets",
            EntityKind::NegativeProductTarget => "/v2/sp/negativeTargets",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Campaign => "campaign",
            EntityKind::AdGroup => "ad_group",
            EntityKind::ProductAd => "product_ad",
            EntityKind::Keyword => "keyword",
            EntityKind::NegativeKeyword => "negative_keyword",
            EntityKind::ProductTarget => "product_target",
            EntityKind::NegativeProductTarget => "negative_product_target",
        }
    }

    fn created_id(&self, item: &BulkItemResponse) -> Option<u64> {
        match self {
            EntityKind::Campaign => item.campaign_id,
            EntityKind::AdGroup => item.ad_group_id,
            EntityKind::ProductAd => item.ad_id,
            EntityKind::Keyword | EntityKind::NegativeKeyword => item.keyword_id,
            EntityKind::ProductTarget | EntityKind::NegativeProductTarget => item.target_id,
        }
    }
}

/// Stateless gateway over an [`AdsTransport`].
#[derive(Clone)]
pub struct AdsGateway {
    transport: Arc<dyn AdsTransport>,
}

impl AdsGateway {
    pub fn new(transport: Arc<dyn AdsTransport>) -> Self {
        Self { transport }
    }

    pub async fn create_campaigns(
        &self,
        session: &SessionContext,
        profile_id: &str,
        records: &[CampaignRecord],
    ) -> LaunchResult<BulkOutcome> {
        let payload: Vec<CampaignWire> = records.iter().map(CampaignWire::from).collect();
        self.bulk_create(session, profile_id, EntityKind::Campaign, &payload)
            .await
    }

    pub async fn create_ad_groups(
        &self,
        session: &SessionContext,
        profile_id: &str,
        records: &[AdGroupRecord],
    ) -> LaunchResult<BulkOutcome> {
        let payload: Vec<AdGroupWire> = records.iter().map(AdGroupWire::from).collect();
        self.bulk_create(session, profile_id, EntityKind::AdGroup, &payload)
            .await
    }

    pub async fn create_product_ads(
        &self,
        session: &SessionContext,
        profile_id: &str,
        records: &[ProductAdRecord],
    ) -> LaunchResult<BulkOutcome> {
        let payload: Vec<ProductAdWire> = records.iter().map(ProductAdWire::from).collect();
        self.bulk_create(session, profile_id, EntityKind::ProductAd, &payload)
            .await
    }

    /// Create keywords, or negative keywords when `negative` is set.
    pub async fn create_keywords(
        &self,
        session: &SessionContext,
        profile_id: &str,
        records: &[KeywordRecord],
        negative: bool,
    ) -> LaunchResult<BulkOutcome> {
        let kind = if negative {
            EntityKind::NegativeKeyword
        } else {
            EntityKind::Keyword
        };
        let payload: Vec<KeywordWire> = records
            .iter()
            .map(|r| KeywordWire::from_record(r, negative))
            .collect();
        self.bulk_create(session, profile_id, kind, &payload).await
    }

    /// Create ASIN product targets, or negative targets when `negative` is set.
    pub async fn create_product_targets(
        &self,
        session: &SessionContext,
        profile_id: &str,
        records: &[ProductTargetRecord],
        negative: bool,
    ) -> LaunchResult<BulkOutcome> {
        let kind = if negative {
            EntityKind::NegativeProductTarget
        } else {
            EntityKind::ProductTarget
        };
        let payload: Vec<ProductTargetWire> = records
            .iter()
            .map(|r| ProductTargetWire::from_record(r, negative))
            .collect();
        self.bulk_create(session, profile_id, kind, &payload).await
    }

    /// Keyword bid recommendations against one ad group. Empty unless the
    /// API answers 207.
    pub async fn get_bid_recommendations(
        &self,
        session: &SessionContext,
        profile_id: &str,
        ad_group_id: u64,
        keywords: &[String],
        match_type: &str,
    ) -> LaunchResult<Vec<BidRecommendation>> {
        let payload = KeywordBidRecommendationRequest {
            ad_group_id,
            keywords: keywords
                .iter()
                .map(|keyword| KeywordMatch {
                    keyword: keyword.clone(),
                    match_type: match_type.to_string(),
                })
                .collect(),
        };
        let request = ApiRequest::new(
            HttpMethod::Post,
            "/v2/sp/keywords/bidRecommendations",
            session,
            profile_id,
        )
        .with_body(serde_json::to_value(&payload)?);

        metrics::counter!("gateway.requests", "entity" => "keyword_bid_recommendation")
            .increment(1);
        let response = self.transport.send(request).await?;
        if response.status != MULTI_STATUS {
            warn!(
                profile_id,
                ad_group_id,
                status = response.status,
                "Keyword bid recommendations rejected"
            );
            return Ok(Vec::new());
        }

        let body: KeywordBidRecommendationResponse = response.json()?;
        debug!(
            profile_id,
            ad_group_id,
            recommendations = body.recommendations.len(),
            "Keyword bid recommendations received"
        );
        Ok(body.recommendations)
    }

    /// Bid recommendations for ASIN targets against one ad group.
    pub async fn get_target_recommendations(
        &self,
        session: &SessionContext,
        profile_id: &str,
        ad_group_id: u64,
        asin_targets: &[String],
    ) -> LaunchResult<Vec<TargetBidRecommendation>> {
        let payload = TargetBidRecommendationRequest {
            ad_group_id,
            expressions: asin_targets
                .iter()
                .map(|asin| vec![TargetExpression::asin_same_as(asin.clone())])
                .collect(),
        };
        self.target_recommendations(session, profile_id, &payload)
            .await
            .map(Option::unwrap_or_default)
    }

    /// One recommendation call per auto-targeting predicate, paired with the
    /// ad group at the same position. Calls that do not answer 200 are
    /// skipped.
    pub async fn get_auto_target_recommendations(
        &self,
        session: &SessionContext,
        profile_id: &str,
        ad_group_ids: &[u64],
    ) -> LaunchResult<Vec<Vec<TargetBidRecommendation>>> {
        if ad_group_ids.len() < AUTO_TARGET_PREDICATES.len() {
            warn!(
                profile_id,
                ad_groups = ad_group_ids.len(),
                "Fewer ad groups than auto-targeting predicates"
            );
        }

        let mut recommendations = Vec::new();
        for (predicate, ad_group_id) in AUTO_TARGET_PREDICATES.iter().zip(ad_group_ids) {
            let payload = TargetBidRecommendationRequest {
                ad_group_id: *ad_group_id,
                expressions: vec![vec![TargetExpression::predicate(*predicate)]],
            };
            if let Some(found) = self
                .target_recommendations(session, profile_id, &payload)
                .await?
            {
                recommendations.push(found);
            }
        }
        Ok(recommendations)
    }

    /// Ad-group level recommendations, one GET per ad group. Ad groups
    /// whose call does not answer 200 are skipped.
    pub async fn get_ad_group_bid_recommendations(
        &self,
        session: &SessionContext,
        profile_id: &str,
        ad_group_ids: &[u64],
    ) -> LaunchResult<Vec<AdGroupBidRecommendation>> {
        let mut recommendations = Vec::new();
        for ad_group_id in ad_group_ids {
            let request = ApiRequest::new(
                HttpMethod::Get,
                format!("/v2/sp/adGroups/{ad_group_id}/bidRecommendations"),
                session,
                profile_id,
            );
            metrics::counter!("gateway.requests", "entity" => "ad_group_bid_recommendation")
                .increment(1);
            let response = self.transport.send(request).await?;
            if response.status == OK {
                recommendations.push(response.json()?);
            } else {
                warn!(
                    profile_id,
                    ad_group_id,
                    status = response.status,
                    "Ad group bid recommendation rejected"
                );
            }
        }
        Ok(recommendations)
    }

    /// Target ids of every product target in each campaign. A campaign whose
    /// listing fails yields an empty group so positions stay aligned.
    pub async fn list_product_targets(
        &self,
        session: &SessionContext,
        profile_id: &str,
        campaign_ids: &[u64],
    ) -> LaunchResult<Vec<Vec<u64>>> {
        let mut target_ids = Vec::with_capacity(campaign_ids.len());
        for campaign_id in campaign_ids {
            let request = ApiRequest::new(HttpMethod::Get, "/v2/sp/targets", session, profile_id)
                .with_query("campaignIdFilter", campaign_id);
            metrics::counter!("gateway.requests", "entity" => "product_target_list").increment(1);
            let response = self.transport.send(request).await?;
            if response.status == OK {
                let targets: Vec<ProductTargetSummary> = response.json()?;
                target_ids.push(targets.into_iter().map(|t| t.target_id).collect());
            } else {
                warn!(
                    profile_id,
                    campaign_id,
                    status = response.status,
                    "Product target listing rejected"
                );
                target_ids.push(Vec::new());
            }
        }
        Ok(target_ids)
    }

    /// For target group `i`, enable the target at position `i` and pause the
    /// rest, all at `bids[i]`. Returns `false` if any group update was not
    /// accepted.
    pub async fn update_auto_product_targets(
        &self,
        session: &SessionContext,
        profile_id: &str,
        target_groups: &[Vec<u64>],
        bids: &[f64],
    ) -> LaunchResult<bool> {
        let mut all_accepted = true;
        for (i, (group, bid)) in target_groups.iter().zip(bids).enumerate() {
            let payload: Vec<TargetUpdateWire> = group
                .iter()
                .enumerate()
                .map(|(j, target_id)| TargetUpdateWire {
                    target_id: *target_id,
                    state: EntityState::from_enabled(i == j),
                    bid: *bid,
                })
                .collect();
            let request = ApiRequest::new(HttpMethod::Put, "/v2/sp/targets", session, profile_id)
                .with_body(serde_json::to_value(&payload)?);
            metrics::counter!("gateway.requests", "entity" => "product_target_update").increment(1);
            let response = self.transport.send(request).await?;
            if response.status != MULTI_STATUS {
                warn!(
                    profile_id,
                    group = i,
                    status = response.status,
                    "Product target update rejected"
                );
                all_accepted = false;
            }
        }
        Ok(all_accepted)
    }

    async fn target_recommendations(
        &self,
        session: &SessionContext,
        profile_id: &str,
        payload: &TargetBidRecommendationRequest,
    ) -> LaunchResult<Option<Vec<TargetBidRecommendation>>> {
        let request = ApiRequest::new(
            HttpMethod::Post,
            "/v2/sp/targets/bidRecommendations",
            session,
            profile_id,
        )
        .with_body(serde_json::to_value(payload)?);

        metrics::counter!("gateway.requests", "entity" => "target_bid_recommendation").increment(1);
        let response = self.transport.send(request).await?;
        if response.status != OK {
            warn!(
                profile_id,
                ad_group_id = payload.ad_group_id,
                status = response.status,
                "Target bid recommendations rejected"
            );
            return Ok(None);
        }
        let body: TargetBidRecommendationResponse = response.json()?;
        Ok(Some(body.recommendations))
    }

    async fn bulk_create<W: Serialize>(
        &self,
        session: &SessionContext,
        profile_id: &str,
        kind: EntityKind,
        payload: &[W],
    ) -> LaunchResult<BulkOutcome> {
        let expected = payload.len();
        let request = ApiRequest::new(HttpMethod::Post, kind.path(), session, profile_id)
            .with_body(serde_json::to_value(payload)?);

        metrics::counter!("gateway.requests", "entity" => kind.label()).increment(1);
        let response = self.transport.send(request).await?;

        if response.status != MULTI_STATUS {
            warn!(
                entity = kind.label(),
                profile_id,
                status = response.status,
                records = expected,
                "Bulk create rejected"
            );
            metrics::counter!("gateway.total_failures", "entity" => kind.label()).increment(1);
            return Ok(BulkOutcome::TotalFailure {
                status: response.status,
            });
        }

        let items: Vec<BulkItemResponse> = response.json()?;
        if items.len() != expected {
            warn!(
                entity = kind.label(),
                expected,
                received = items.len(),
                "Bulk response length does not match submitted records"
            );
        }

        let mut rows: Vec<RowOutcome> = items
            .iter()
            .take(expected)
            .enumerate()
            .map(|(index, item)| match kind.created_id(item) {
                Some(id) if item.code == SUCCESS_CODE => RowOutcome::Created(id),
                _ => {
                    warn!(
                        entity = kind.label(),
                        index,
                        code = %item.code,
                        description = item.description.as_deref().unwrap_or(""),
                        "Record rejected"
                    );
                    RowOutcome::Failed
                }
            })
            .collect();
        rows.resize(expected, RowOutcome::Failed);

        let rejected = rows.iter().filter(|r| r.is_failed()).count();
        if rejected > 0 {
            metrics::counter!("gateway.rows_rejected", "entity" => kind.label())
                .increment(rejected as u64);
        }
        info!(
            entity = kind.label(),
            profile_id,
            created = expected - rejected,
            rejected,
            "Bulk create processed"
        );

        Ok(BulkOutcome::Partial(rows))
    }
}
