//! Internal entity records and the camelCase wire shapes the advertising
//! API expects for them.

use launch_core::types::{BiddingSpec, EntityState};
use serde::{Deserialize, Serialize};

pub const CAMPAIGN_TYPE_SPONSORED_PRODUCTS: &str = "sponsoredProducts";
pub const TARGETING_MANUAL: &str = "manual";
pub const EXPRESSION_ASIN_SAME_AS: &str = "asinSameAs";

// ─── Internal records ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRecord {
    pub campaign_name: String,
    pub campaign_type: String,
    pub targeting_type: String,
    pub state: EntityState,
    pub daily_budget: f64,
    pub start_date: String,
    pub end_date: Option<String>,
    pub premium_bid_adjustment: bool,
    pub bidding: Option<BiddingSpec>,
}

impl CampaignRecord {
    /// Manually targeted Sponsored Products campaign.
    pub fn manual(
        campaign_name: impl Into<String>,
        daily_budget: f64,
        start_date: impl Into<String>,
        state: EntityState,
    ) -> Self {
        Self {
            campaign_name: campaign_name.into(),
            campaign_type: CAMPAIGN_TYPE_SPONSORED_PRODUCTS.to_string(),
            targeting_type: TARGETING_MANUAL.to_string(),
            state,
            daily_budget,
            start_date: start_date.into(),
            end_date: None,
            premium_bid_adjustment: false,
            bidding: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdGroupRecord {
    pub campaign_id: u64,
    pub name: String,
    pub default_bid: f64,
    pub state: EntityState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductAdRecord {
    pub campaign_id: u64,
    pub ad_group_id: u64,
    pub asin: String,
    pub sku: Option<String>,
    pub state: EntityState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRecord {
    pub campaign_id: u64,
    pub ad_group_id: u64,
    pub keyword_text: String,
    pub match_type: String,
    pub state: EntityState,
    pub bid: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductTargetRecord {
    pub campaign_id: u64,
    pub ad_group_id: u64,
    pub asin_target: String,
    pub state: EntityState,
    pub bid: Option<f64>,
}

// ─── Wire shapes (outbound) ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignWire {
    pub name: String,
    pub campaign_type: String,
    pub targeting_type: String,
    pub state: EntityState,
    pub daily_budget: f64,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium_bid_adjustment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidding: Option<BiddingSpec>,
}

impl From<&CampaignRecord> for CampaignWire {
    fn from(record: &CampaignRecord) -> Self {
        Self {
            name: record.campaign_name.clone(),
            campaign_type: record.campaign_type.clone(),
            targeting_type: record.targeting_type.clone(),
            state: record.state,
            daily_budget: record.daily_budget,
            start_date: record.start_date.clone(),
            end_date: record.end_date.clone(),
            premium_bid_adjustment: record.premium_bid_adjustment.then_some(true),
            bidding: record.bidding.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroupWire {
    pub name: String,
    pub campaign_id: u64,
    pub default_bid: f64,
    pub state: EntityState,
}

impl From<&AdGroupRecord> for AdGroupWire {
    fn from(record: &AdGroupRecord) -> Self {
        Self {
            name: record.name.clone(),
            campaign_id: record.campaign_id,
            default_bid: record.default_bid,
            state: record.state,
        }
    }
}

/// Sellers advertise by SKU; vendors without one fall back to the ASIN.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAdWire {
    pub campaign_id: u64,
    pub ad_group_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asin: Option<String>,
    pub state: EntityState,
}

impl From<&ProductAdRecord> for ProductAdWire {
    fn from(record: &ProductAdRecord) -> Self {
        let sku = record.sku.clone().filter(|s| !s.trim().is_empty());
        let asin = if sku.is_none() {
            Some(record.asin.clone())
        } else {
            None
        };
        Self {
            campaign_id: record.campaign_id,
            ad_group_id: record.ad_group_id,
            sku,
            asin,
            state: record.state,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordWire {
    pub keyword_text: String,
    pub match_type: String,
    pub state: EntityState,
    pub campaign_id: u64,
    pub ad_group_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<f64>,
}

impl KeywordWire {
    /// Negative keywords carry no bid.
    pub fn from_record(record: &KeywordRecord, negative: bool) -> Self {
        Self {
            keyword_text: record.keyword_text.clone(),
            match_type: record.match_type.clone(),
            state: record.state,
            campaign_id: record.campaign_id,
            ad_group_id: record.ad_group_id,
            bid: if negative { None } else { record.bid },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetExpression {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TargetExpression {
    pub fn asin_same_as(asin: impl Into<String>) -> Self {
        Self {
            kind: EXPRESSION_ASIN_SAME_AS.to_string(),
            value: Some(asin.into()),
        }
    }

    pub fn predicate(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTargetWire {
    pub campaign_id: u64,
    pub ad_group_id: u64,
    pub state: EntityState,
    pub expression: Vec<TargetExpression>,
    pub expression_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<f64>,
}

impl ProductTargetWire {
    pub fn from_record(record: &ProductTargetRecord, negative: bool) -> Self {
        Self {
            campaign_id: record.campaign_id,
            ad_group_id: record.ad_group_id,
            state: record.state,
            expression: vec![TargetExpression::asin_same_as(record.asin_target.clone())],
            expression_type: TARGETING_MANUAL.to_string(),
            bid: if negative { None } else { record.bid },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordBidRecommendationRequest {
    pub ad_group_id: u64,
    pub keywords: Vec<KeywordMatch>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    pub keyword: String,
    pub match_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetBidRecommendationRequest {
    pub ad_group_id: u64,
    pub expressions: Vec<Vec<TargetExpression>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetUpdateWire {
    pub target_id: u64,
    pub state: EntityState,
    pub bid: f64,
}

// ─── Wire shapes (inbound) ─────────────────────────────────────────────────

/// One item of a 207 bulk-create response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemResponse {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<u64>,
    #[serde(default)]
    pub ad_group_id: Option<u64>,
    #[serde(default)]
    pub ad_id: Option<u64>,
    #[serde(default)]
    pub keyword_id: Option<u64>,
    #[serde(default)]
    pub target_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedBid {
    pub suggested: f64,
    pub range_start: f64,
    pub range_end: f64,
}

/// Bid recommendation for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidRecommendation {
    pub code: String,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub match_type: Option<String>,
    #[serde(default)]
    pub suggested_bid: Option<SuggestedBid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordBidRecommendationResponse {
    #[serde(default)]
    pub ad_group_id: Option<u64>,
    #[serde(default)]
    pub recommendations: Vec<BidRecommendation>,
}

/// Bid recommendation for one targeting expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetBidRecommendation {
    pub code: String,
    #[serde(default)]
    pub expression: Vec<TargetExpression>,
    #[serde(default)]
    pub suggested_bid: Option<SuggestedBid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetBidRecommendationResponse {
    #[serde(default)]
    pub ad_group_id: Option<u64>,
    #[serde(default)]
    pub recommendations: Vec<TargetBidRecommendation>,
}

/// Ad-group level bid recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdGroupBidRecommendation {
    pub ad_group_id: u64,
    #[serde(default)]
    pub suggested_bid: Option<SuggestedBid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTargetSummary {
    pub target_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use launch_core::types::BidAdjustment;
    use serde_json::json;

    #[test]
    fn test_campaign_wire_renames_and_omits_optional_fields() {
        let record = CampaignRecord::manual(
            "B0 - SPKW_SKW - P - T25 - shoe",
            10.0,
            "20240501",
            EntityState::Enabled,
        );
        let wire = serde_json::to_value(CampaignWire::from(&record)).unwrap();
        assert_eq!(
            wire,
            json!({
                "name": "B0 - SPKW_SKW - P - T25 - shoe",
                "campaignType": "sponsoredProducts",
                "targetingType": "manual",
                "state": "enabled",
                "dailyBudget": 10.0,
                "startDate": "20240501"
            })
        );
    }

    #[test]
    fn test_campaign_wire_includes_bidding_and_premium_adjustment() {
        let mut record =
            CampaignRecord::manual("c", 5.0, "20240501", EntityState::Paused);
        record.end_date = Some("20241231".into());
        record.premium_bid_adjustment = true;
        record.bidding = Some(BiddingSpec {
            strategy: Some("legacyForSales".into()),
            adjustments: vec![BidAdjustment {
                predicate: "placementTop".into(),
                percentage: 50.0,
            }],
        });
        let wire = serde_json::to_value(CampaignWire::from(&record)).unwrap();
        assert_eq!(wire["endDate"], "20241231");
        assert_eq!(wire["premiumBidAdjustment"], true);
        assert_eq!(wire["bidding"]["strategy"], "legacyForSales");
        assert_eq!(wire["bidding"]["adjustments"][0]["predicate"], "placementTop");
        assert_eq!(wire["state"], "paused");
    }

    #[test]
    fn test_product_ad_prefers_sku_over_asin() {
        let mut record = ProductAdRecord {
            campaign_id: 1,
            ad_group_id: 2,
            asin: "B000TEST01".into(),
            sku: Some("SKU-1".into()),
            state: EntityState::Enabled,
        };
        let wire = serde_json::to_value(ProductAdWire::from(&record)).unwrap();
        assert_eq!(wire["sku"], "SKU-1");
        assert!(wire.get("asin").is_none());

        record.sku = None;
        let wire = serde_json::to_value(ProductAdWire::from(&record)).unwrap();
        assert_eq!(wire["asin"], "B000TEST01");
        assert!(wire.get("sku").is_none());
    }

    #[test]
    fn test_negative_keyword_drops_bid() {
        let record = KeywordRecord {
            campaign_id: 1,
            ad_group_id: 2,
            keyword_text: "cheap".into(),
            match_type: "negativeExact".into(),
            state: EntityState::Enabled,
            bid: Some(0.8),
        };
        let positive = serde_json::to_value(KeywordWire::from_record(&record, false)).unwrap();
        let negative = serde_json::to_value(KeywordWire::from_record(&record, true)).unwrap();
        assert_eq!(positive["bid"], 0.8);
        assert!(negative.get("bid").is_none());
        assert_eq!(negative["keywordText"], "cheap");
    }

    #[test]
    fn test_product_target_expression_shape() {
        let record = ProductTargetRecord {
            campaign_id: 1,
            ad_group_id: 2,
            asin_target: "B0COMPETE".into(),
            state: EntityState::Enabled,
            bid: Some(1.2),
        };
        let wire = serde_json::to_value(ProductTargetWire::from_record(&record, false)).unwrap();
        assert_eq!(
            wire["expression"],
            json!([{"type": "asinSameAs", "value": "B0COMPETE"}])
        );
        assert_eq!(wire["expressionType"], "manual");
        assert_eq!(wire["bid"], 1.2);
    }
}
