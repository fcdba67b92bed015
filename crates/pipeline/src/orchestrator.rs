//! Campaign orchestrator. Drives one launch through the ordered creation
//! stages and reconciles per-row outcomes into a [`StageStatus`].
//!
//! Stages run strictly in sequence. A stage whose bulk call is rejected as
//! a whole aborts the launch with the flags set so far; per-row rejections
//! are carried downstream and reported by [`reconcile`].

use crate::bids::{BidPolicy, BidResolver};
use crate::plan::{self, LaunchParams, PlanRow, EXACT_MATCH};
use launch_core::types::{CampaignRequest, RowOutcome, StageStatus, ALL_CREATED_MESSAGE};
use launch_core::{LaunchResult, SessionContext};
use launch_gateway::wire::BidRecommendation;
use launch_gateway::{AdsGateway, BulkOutcome};
use tracing::{info, warn};
use uuid::Uuid;

/// Result of one pipeline stage.
#[derive(Debug)]
pub enum Step<T> {
    /// Stage succeeded; hand `T` to the next stage.
    Continue(StageStatus, T),
    /// Stop here and report the status accumulated so far.
    Abort(StageStatus),
}

/// Unwraps a `Continue`, or returns the accumulated status on `Abort`.
macro_rules! next_stage {
    ($step:expr) => {
        match $step {
            Step::Continue(status, next) => (status, next),
            Step::Abort(status) => return Ok(status),
        }
    };
}

impl From<&LaunchParams> for BidPolicy {
    fn from(params: &LaunchParams) -> Self {
        Self {
            initial_bid: params.initial_bid,
            default_bid: params.default_bid,
            max_bid: params.max_bid,
            adjustment: params.bid_adjustment,
        }
    }
}

#[derive(Clone)]
pub struct CampaignOrchestrator {
    gateway: AdsGateway,
    resolver: BidResolver,
}

impl CampaignOrchestrator {
    pub fn new(gateway: AdsGateway) -> Self {
        let resolver = BidResolver::new(gateway.clone());
        Self { gateway, resolver }
    }

    /// Launch one campaign per keyword. Transport and decoding failures are
    /// returned as errors; remote rejections are reported in the status.
    pub async fn launch(
        &self,
        session: &SessionContext,
        request: &CampaignRequest,
    ) -> LaunchResult<StageStatus> {
        request.validate()?;
        metrics::counter!("launch.requests").increment(1);

        let launch_id = Uuid::new_v4();
        let params = LaunchParams::derive(request);
        let rows = plan::build_rows(&params, &request.keywords);
        info!(
            %launch_id,
            profile_id = %params.profile_id,
            rows = rows.len(),
            prefix = %params.name_prefix,
            "Launching single-keyword campaigns"
        );

        let status = StageStatus::default();
        let (status, rows) =
            next_stage!(self.create_campaigns(session, &params, status, rows).await?);
        let (status, rows) =
            next_stage!(self.create_ad_groups(session, &params, status, rows).await?);
        let (status, rows) =
            next_stage!(self.create_product_ads(session, &params, status, rows).await?);
        let (status, (rows, recommendations)) =
            next_stage!(self.fetch_recommendations(session, &params, status, rows).await?);
        let (status, rows) = next_stage!(
            self.create_keywords(session, &params, status, rows, &recommendations)
                .await?
        );

        let status = reconcile(status, &rows);
        if status.success {
            metrics::counter!("launch.succeeded").increment(1);
        }
        info!(
            %launch_id,
            profile_id = %params.profile_id,
            success = status.success,
            "Launch finished"
        );
        Ok(status)
    }

    async fn create_campaigns(
        &self,
        session: &SessionContext,
        params: &LaunchParams,
        mut status: StageStatus,
        mut rows: Vec<PlanRow>,
    ) -> LaunchResult<Step<Vec<PlanRow>>> {
        let records = plan::campaign_records(params, &rows);
        let outcome = self
            .gateway
            .create_campaigns(session, &params.profile_id, &records)
            .await?;
        if !apply_outcome(outcome, &mut rows, |row| &mut row.campaign) {
            return Ok(abort("campaign", params, status));
        }
        status.campaign_created = true;
        Ok(Step::Continue(status, rows))
    }

    async fn create_ad_groups(
        &self,
        session: &SessionContext,
        params: &LaunchParams,
        mut status: StageStatus,
        mut rows: Vec<PlanRow>,
    ) -> LaunchResult<Step<Vec<PlanRow>>> {
        let records = plan::ad_group_records(params, &rows);
        let outcome = self
            .gateway
            .create_ad_groups(session, &params.profile_id, &records)
            .await?;
        if !apply_outcome(outcome, &mut rows, |row| &mut row.ad_group) {
            return Ok(abort("ad_group", params, status));
        }
        status.ad_group_created = true;
        Ok(Step::Continue(status, rows))
    }

    async fn create_product_ads(
        &self,
        session: &SessionContext,
        params: &LaunchParams,
        mut status: StageStatus,
        mut rows: Vec<PlanRow>,
    ) -> LaunchResult<Step<Vec<PlanRow>>> {
        let records = plan::product_ad_records(params, &rows);
        let outcome = self
            .gateway
            .create_product_ads(session, &params.profile_id, &records)
            .await?;
        if !apply_outcome(outcome, &mut rows, |row| &mut row.product_ad) {
            return Ok(abort("product_ad", params, status));
        }
        status.product_ad_created = true;
        Ok(Step::Continue(status, rows))
    }

    /// Recommendations for the whole keyword list are requested against the
    /// first row's ad group only.
    async fn fetch_recommendations(
        &self,
        session: &SessionContext,
        params: &LaunchParams,
        mut status: StageStatus,
        rows: Vec<PlanRow>,
    ) -> LaunchResult<Step<(Vec<PlanRow>, Vec<BidRecommendation>)>> {
        let ad_group_id = rows.first().map_or(0, |row| row.ad_group.wire_id());
        let keywords: Vec<String> = rows.iter().map(|row| row.keyword.clone()).collect();
        let recommendations = self
            .resolver
            .get_bid_recommendations(
                session,
                &params.profile_id,
                ad_group_id,
                &keywords,
                EXACT_MATCH,
            )
            .await?;
        if recommendations.is_empty() {
            return Ok(abort("bid_recommendation", params, status));
        }
        status.bid_recommendations_received = true;
        Ok(Step::Continue(status, (rows, recommendations)))
    }

    async fn create_keywords(
        &self,
        session: &SessionContext,
        params: &LaunchParams,
        mut status: StageStatus,
        mut rows: Vec<PlanRow>,
        recommendations: &[BidRecommendation],
    ) -> LaunchResult<Step<Vec<PlanRow>>> {
        let bids = BidPolicy::from(params).resolve(recommendations, rows.len());
        let records = plan::keyword_records(&rows, &bids);
        let outcome = self
            .gateway
            .create_keywords(session, &params.profile_id, &records, false)
            .await?;
        if !apply_outcome(outcome, &mut rows, |row| &mut row.keyword_target) {
            return Ok(abort("keyword", params, status));
        }
        status.keyword_created = true;
        Ok(Step::Continue(status, rows))
    }
}

/// Copies per-row outcomes into the selected slot. Returns `false` when the
/// batch was rejected as a whole.
fn apply_outcome(
    outcome: BulkOutcome,
    rows: &mut [PlanRow],
    slot: impl Fn(&mut PlanRow) -> &mut RowOutcome,
) -> bool {
    match outcome.into_rows() {
        Some(outcomes) => {
            for (row, result) in rows.iter_mut().zip(outcomes) {
                *slot(row) = result;
            }
            true
        }
        None => false,
    }
}

fn abort<T>(stage: &'static str, params: &LaunchParams, status: StageStatus) -> Step<T> {
    warn!(stage, profile_id = %params.profile_id, "Launch aborted");
    metrics::counter!("launch.aborted", "stage" => stage).increment(1);
    Step::Abort(status)
}

/// Final status: success when every row's campaign, ad group and keyword
/// were created, otherwise one line per row naming the first missing entity.
pub fn reconcile(mut status: StageStatus, rows: &[PlanRow]) -> StageStatus {
    let all_created = rows.iter().all(|row| {
        row.campaign.is_created() && row.ad_group.is_created() && row.keyword_target.is_created()
    });
    if all_created {
        status.success = true;
        status.message = ALL_CREATED_MESSAGE.to_string();
        return status;
    }

    let mut message = String::new();
    for row in rows {
        let (keyword, i) = (&row.keyword, row.index);
        if !row.campaign.is_created() {
            message.push_str(&format!(
                "\nCampaign with keyword \"{keyword}\" at position {i} is not created."
            ));
        } else if !row.ad_group.is_created() {
            message.push_str(&format!(
                "\nAd group for keyword \"{keyword}\" at position {i} is not created."
            ));
        } else if !row.keyword_target.is_created() {
            message.push_str(&format!(
                "\nKeyword \"{keyword}\" at position {i} is not created."
            ));
        }
    }
    status.success = false;
    status.message = message;
    status
}
