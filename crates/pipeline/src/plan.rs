//! Launch parameters shared by every keyword row, and the per-keyword plan
//! rows the orchestrator drives through the gateway.

use launch_core::types::{
    BiddingSpec, CampaignRequest, EntityState, InitialBidPolicy, Placement, RowOutcome,
};
use launch_gateway::wire::{AdGroupRecord, CampaignRecord, KeywordRecord, ProductAdRecord};

/// Match type used for launched keywords and their recommendations.
pub const EXACT_MATCH: &str = "exact";

/// Campaign naming tag for single-keyword Sponsored Products campaigns.
const NAME_TAG: &str = "SPKW_SKW";

/// Request-level parameters derived once, before any remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchParams {
    pub profile_id: String,
    pub asin: String,
    pub sku: Option<String>,
    pub daily_budget: f64,
    pub start_date: String,
    pub end_date: Option<String>,
    pub state: EntityState,
    pub bidding: Option<BiddingSpec>,
    pub placement: Placement,
    pub name_prefix: String,
    pub default_bid: f64,
    pub max_bid: f64,
    /// Fraction, e.g. `0.10` for +10%.
    pub bid_adjustment: f64,
    pub initial_bid: InitialBidPolicy,
}

impl LaunchParams {
    pub fn derive(request: &CampaignRequest) -> Self {
        let predicate = request
            .bidding
            .as_ref()
            .and_then(|b| b.adjustments.first())
            .map(|a| a.predicate.as_str());
        let placement = Placement::from_predicate(predicate);

        let bidding = request
            .bidding
            .clone()
            .map(|mut bidding| {
                if placement == Placement::None {
                    bidding.adjustments.clear();
                }
                bidding
            })
            .filter(|bidding| bidding.strategy.is_some());

        let name_prefix = format!(
            "{} - {} - P{} - T{}",
            request.asin,
            NAME_TAG,
            placement.name_suffix(),
            request.acostarget
        );

        Self {
            profile_id: request.profile_id.clone(),
            asin: request.asin.clone(),
            sku: request.sku.clone(),
            daily_budget: request.daily_budget,
            start_date: normalize_date(&request.campaign_start_date),
            end_date: request
                .campaign_end_date
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .map(normalize_date),
            state: EntityState::from_enabled(request.enabled),
            bidding,
            placement,
            name_prefix,
            default_bid: request.default_bid,
            max_bid: request.max_bid,
            bid_adjustment: request.bid_adjustment / 100.0,
            initial_bid: request.initial_keyword_bid,
        }
    }
}

/// `2024-05-01` → `20240501`.
fn normalize_date(date: &str) -> String {
    date.trim().replace('-', "")
}

/// One keyword's campaign, ad group, product ad and keyword target.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRow {
    pub index: usize,
    pub keyword: String,
    pub campaign_name: String,
    pub ad_group_name: String,
    pub state: EntityState,
    pub campaign: RowOutcome,
    pub ad_group: RowOutcome,
    pub product_ad: RowOutcome,
    pub keyword_target: RowOutcome,
}

/// One row per keyword, in keyword order.
pub fn build_rows(params: &LaunchParams, keywords: &[String]) -> Vec<PlanRow> {
    let n = keywords.len();
    keywords
        .iter()
        .enumerate()
        .map(|(i, keyword)| PlanRow {
            index: i,
            keyword: keyword.clone(),
            campaign_name: format!("{} - {}", params.name_prefix, keyword),
            ad_group_name: format!("{} {}/{} ({})", params.name_prefix, i + 1, n, keyword),
            state: params.state,
            campaign: RowOutcome::Unset,
            ad_group: RowOutcome::Unset,
            product_ad: RowOutcome::Unset,
            keyword_target: RowOutcome::Unset,
        })
        .collect()
}

pub fn campaign_records(params: &LaunchParams, rows: &[PlanRow]) -> Vec<CampaignRecord> {
    rows.iter()
        .map(|row| {
            let mut record = CampaignRecord::manual(
                row.campaign_name.clone(),
                params.daily_budget,
                params.start_date.clone(),
                row.state,
            );
            record.end_date = params.end_date.clone();
            record.bidding = params.bidding.clone();
            record
        })
        .collect()
}

pub fn ad_group_records(params: &LaunchParams, rows: &[PlanRow]) -> Vec<AdGroupRecord> {
    rows.iter()
        .map(|row| AdGroupRecord {
            campaign_id: row.campaign.wire_id(),
            name: row.ad_group_name.clone(),
            default_bid: params.default_bid,
            state: row.state,
        })
        .collect()
}

pub fn product_ad_records(params: &LaunchParams, rows: &[PlanRow]) -> Vec<ProductAdRecord> {
    rows.iter()
        .map(|row| ProductAdRecord {
            campaign_id: row.campaign.wire_id(),
            ad_group_id: row.ad_group.wire_id(),
            asin: params.asin.clone(),
            sku: params.sku.clone(),
            state: row.state,
        })
        .collect()
}

/// Keyword records bound to `bids`, which is aligned with `rows`.
pub fn keyword_records(rows: &[PlanRow], bids: &[f64]) -> Vec<KeywordRecord> {
    rows.iter()
        .zip(bids)
        .map(|(row, bid)| KeywordRecord {
            campaign_id: row.campaign.wire_id(),
            ad_group_id: row.ad_group.wire_id(),
            keyword_text: row.keyword.clone(),
            match_type: EXACT_MATCH.to_string(),
            state: row.state,
            bid: Some(*bid),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use launch_core::types::BidAdjustment;
    use serde_json::json;

    fn request(bidding: serde_json::Value) -> CampaignRequest {
        serde_json::from_value(json!({
            "profile_id": "42",
            "asin": "B000TEST01",
            "sku": "SKU-1",
            "daily_budget": 10,
            "campaign_start_date": "2024-05-01",
            "campaign_end_date": "2024-12-31",
            "enabled": false,
            "bidding": bidding,
            "keywords": "shoe, boot",
            "acostarget": 25,
            "default_bid": 0.5,
            "max_bid": 2.0,
            "bid_adjustment": "10",
            "initial_keyword_bid": "default"
        }))
        .unwrap()
    }

    fn bidding(strategy: Option<&str>, predicate: &str) -> serde_json::Value {
        json!({
            "strategy": strategy,
            "adjustments": [{"predicate": predicate, "percentage": 30}]
        })
    }

    #[test]
    fn test_top_of_search_suffix_keeps_adjustments() {
        let req = request(bidding(Some("legacyForSales"), "placementTop"));
        let params = LaunchParams::derive(&req);
        assert_eq!(params.name_prefix, "B000TEST01 - SPKW_SKW - P_TOS - T25");
        let bidding = params.bidding.unwrap();
        assert_eq!(
            bidding.adjustments,
            vec![BidAdjustment {
                predicate: "placementTop".into(),
                percentage: 30.0
            }]
        );
    }

    #[test]
    fn test_product_page_suffix() {
        let params = LaunchParams::derive(&request(bidding(
            Some("autoForSales"),
            "placementProductPage",
        )));
        assert!(params.name_prefix.contains("P_PP"));
        assert_eq!(params.placement, Placement::ProductPage);
    }

    #[test]
    fn test_unknown_predicate_clears_adjustments_and_suffix() {
        let params = LaunchParams::derive(&request(bidding(Some("manual"), "placementRest")));
        assert_eq!(params.name_prefix, "B000TEST01 - SPKW_SKW - P - T25");
        let bidding = params.bidding.unwrap();
        assert_eq!(bidding.strategy.as_deref(), Some("manual"));
        assert!(bidding.adjustments.is_empty());
    }

    #[test]
    fn test_null_strategy_drops_bidding() {
        let params = LaunchParams::derive(&request(bidding(None, "placementTop")));
        assert!(params.bidding.is_none());
        assert_eq!(params.placement, Placement::TopOfSearch);
        assert!(params.name_prefix.contains("P_TOS"));
    }

    #[test]
    fn test_missing_bidding_is_tolerated() {
        let params = LaunchParams::derive(&request(serde_json::Value::Null));
        assert!(params.bidding.is_none());
        assert_eq!(params.placement, Placement::None);
    }

    #[test]
    fn test_dates_state_and_adjustment_are_normalized() {
        let params = LaunchParams::derive(&request(bidding(None, "placementTop")));
        assert_eq!(params.start_date, "20240501");
        assert_eq!(params.end_date.as_deref(), Some("20241231"));
        assert_eq!(params.state, EntityState::Paused);
        assert!((params.bid_adjustment - 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_rows_carry_names_and_positions() {
        let req = request(bidding(None, "placementTop"));
        let params = LaunchParams::derive(&req);
        let rows = build_rows(&params, &req.keywords);

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1].campaign_name,
            "B000TEST01 - SPKW_SKW - P_TOS - T25 - boot"
        );
        assert_eq!(rows[1].ad_group_name, "B000TEST01 - SPKW_SKW - P_TOS - T25 2/2 (boot)");
        assert!(rows.iter().all(|r| r.campaign == RowOutcome::Unset));
    }

    #[test]
    fn test_failed_rows_are_carried_with_zero_ids() {
        let req = request(bidding(None, "placementTop"));
        let params = LaunchParams::derive(&req);
        let mut rows = build_rows(&params, &req.keywords);
        rows[0].campaign = RowOutcome::Created(10);
        rows[1].campaign = RowOutcome::Failed;

        let groups = ad_group_records(&params, &rows);
        assert_eq!(groups[0].campaign_id, 10);
        assert_eq!(groups[1].campaign_id, 0);
        assert_eq!(groups[1].default_bid, 0.5);
    }
}
