//! Bid recommendation resolver. Fetches keyword recommendations and derives
//! the initial bid for each keyword.

use launch_core::types::{InitialBidPolicy, SUCCESS_CODE};
use launch_core::{LaunchResult, SessionContext};
use launch_gateway::wire::BidRecommendation;
use launch_gateway::AdsGateway;
use tracing::info;

/// Bid derivation inputs shared by every keyword of one launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BidPolicy {
    pub initial_bid: InitialBidPolicy,
    pub default_bid: f64,
    pub max_bid: f64,
    /// Fraction applied on top of the recommended figure.
    pub adjustment: f64,
}

impl BidPolicy {
    /// Bid for one keyword. Falls back to the default bid when the
    /// recommendation is missing or failed, or when the adjusted figure is
    /// not strictly below the max bid.
    pub fn bid_for(&self, recommendation: Option<&BidRecommendation>) -> f64 {
        let suggested = match recommendation {
            Some(rec) if rec.code == SUCCESS_CODE => rec.suggested_bid,
            _ => None,
        };
        let Some(suggested) = suggested else {
            return self.default_bid;
        };

        let base = match self.initial_bid {
            InitialBidPolicy::Default => return self.default_bid,
            InitialBidPolicy::Suggested => suggested.suggested,
            InitialBidPolicy::Lower => suggested.range_start,
            InitialBidPolicy::Higher => suggested.range_end,
        };
        let candidate = base * (1.0 + self.adjustment);
        if candidate < self.max_bid {
            candidate
        } else {
            self.default_bid
        }
    }

    /// One bid per keyword position. Positions the platform returned no
    /// recommendation for get the default bid.
    pub fn resolve(&self, recommendations: &[BidRecommendation], keywords: usize) -> Vec<f64> {
        (0..keywords)
            .map(|i| self.bid_for(recommendations.get(i)))
            .collect()
    }
}

/// Fetches keyword bid recommendations through the gateway.
#[derive(Clone)]
pub struct BidResolver {
    gateway: AdsGateway,
}

impl BidResolver {
    pub fn new(gateway: AdsGateway) -> Self {
        Self { gateway }
    }

    /// Recommendations for `keywords` against a single ad group, in keyword
    /// order. Empty when the platform rejects the call.
    pub async fn get_bid_recommendations(
        &self,
        session: &SessionContext,
        profile_id: &str,
        ad_group_id: u64,
        keywords: &[String],
        match_type: &str,
    ) -> LaunchResult<Vec<BidRecommendation>> {
        let recommendations = self
            .gateway
            .get_bid_recommendations(session, profile_id, ad_group_id, keywords, match_type)
            .await?;

        let succeeded = recommendations
            .iter()
            .filter(|r| r.code == SUCCESS_CODE)
            .count();
        info!(
            profile_id,
            ad_group_id,
            keywords = keywords.len(),
            received = recommendations.len(),
            succeeded,
            "Bid recommendations resolved"
        );
        Ok(recommendations)
    }
}
