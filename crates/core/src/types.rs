//! Launch domain types: inbound campaign request, bidding descriptor,
//! per-row creation outcomes and the stage status returned to the caller.

use crate::error::{LaunchError, LaunchResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-item code the advertising API reports for an accepted entity.
pub const SUCCESS_CODE: &str = "SUCCESS";

/// Placement predicate for top-of-search bid adjustments.
pub const PLACEMENT_TOP: &str = "placementTop";

/// Placement predicate for product-page bid adjustments.
pub const PLACEMENT_PRODUCT_PAGE: &str = "placementProductPage";

/// Message set on a fully successful launch.
pub const ALL_CREATED_MESSAGE: &str = "All campaigns are successfully created!";

// ─── Inbound request ───────────────────────────────────────────────────────

/// Request to launch one single-keyword campaign per keyword.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CampaignRequest {
    #[serde(deserialize_with = "lenient::string")]
    #[schema(value_type = String, example = "1234567890")]
    pub profile_id: String,
    pub asin: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub daily_budget: f64,
    #[schema(example = "2024-05-01")]
    pub campaign_start_date: String,
    #[serde(default)]
    pub campaign_end_date: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bidding: Option<BiddingSpec>,
    /// Comma-separated keyword list.
    #[serde(deserialize_with = "lenient::keyword_list")]
    #[schema(value_type = String, example = "running shoes, trail shoes")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    #[schema(value_type = String, example = "25")]
    pub acostarget: String,
    #[serde(deserialize_with = "lenient::number")]
    pub default_bid: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub max_bid: f64,
    /// Percentage units: `10` means +10%.
    #[serde(default, deserialize_with = "lenient::number")]
    pub bid_adjustment: f64,
    pub initial_keyword_bid: InitialBidPolicy,
}

impl CampaignRequest {
    /// Validate the request at the API boundary, before any remote call.
    pub fn validate(&self) -> LaunchResult<()> {
        if self.profile_id.trim().is_empty() {
            return Err(LaunchError::Validation("'profile_id' must not be empty".into()));
        }
        if self.asin.trim().is_empty() {
            return Err(LaunchError::Validation("'asin' must not be empty".into()));
        }
        if self.campaign_start_date.trim().is_empty() {
            return Err(LaunchError::Validation(
                "'campaign_start_date' must not be empty".into(),
            ));
        }
        if self.keywords.is_empty() {
            return Err(LaunchError::Validation(
                "'keywords' must contain at least one keyword".into(),
            ));
        }
        if self.default_bid < 0.0 || self.max_bid < 0.0 {
            return Err(LaunchError::Validation("bids must be non-negative".into()));
        }
        let amounts = [
            ("daily_budget", self.daily_budget),
            ("default_bid", self.default_bid),
            ("max_bid", self.max_bid),
            ("bid_adjustment", self.bid_adjustment),
        ];
        if let Some((field, _)) = amounts.iter().find(|(_, v)| !v.is_finite()) {
            return Err(LaunchError::Validation(format!("'{field}' must be a finite number")));
        }
        if self.daily_budget < 0.0 {
            return Err(LaunchError::Validation(
                "'daily_budget' must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Campaign bidding descriptor, passed through to the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BiddingSpec {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub adjustments: Vec<BidAdjustment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BidAdjustment {
    pub predicate: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub percentage: f64,
}

/// Where a placement bid boost applies. Only the first adjustment's
/// predicate is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    TopOfSearch,
    ProductPage,
    None,
}

impl Placement {
    pub fn from_predicate(predicate: Option<&str>) -> Self {
        match predicate {
            Some(PLACEMENT_TOP) => Placement::TopOfSearch,
            Some(PLACEMENT_PRODUCT_PAGE) => Placement::ProductPage,
            _ => Placement::None,
        }
    }

    /// Suffix embedded after `P` in campaign names.
    pub fn name_suffix(&self) -> &'static str {
        match self {
            Placement::TopOfSearch => "_TOS",
            Placement::ProductPage => "_PP",
            Placement::None => "",
        }
    }
}

/// Which recommendation figure seeds the initial keyword bid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InitialBidPolicy {
    Default,
    Suggested,
    Lower,
    Higher,
}

/// Remote entity state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityState {
    Enabled,
    Paused,
}

impl EntityState {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            EntityState::Enabled
        } else {
            EntityState::Paused
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityState::Enabled => "enabled",
            EntityState::Paused => "paused",
        }
    }
}

// ─── Row outcomes ──────────────────────────────────────────────────────────

/// Creation state of one remote entity for one keyword row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowOutcome {
    /// Not attempted yet.
    #[default]
    Unset,
    /// Accepted by the remote API with this id.
    Created(u64),
    /// Rejected by the remote API.
    Failed,
}

impl RowOutcome {
    pub fn id(&self) -> Option<u64> {
        match self {
            RowOutcome::Created(id) => Some(*id),
            _ => None,
        }
    }

    /// Id sent on the wire when the row is carried into a later stage.
    /// Rows without an id are sent with `0`.
    pub fn wire_id(&self) -> u64 {
        self.id().unwrap_or(0)
    }

    pub fn is_created(&self) -> bool {
        matches!(self, RowOutcome::Created(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RowOutcome::Failed)
    }
}

// ─── Stage status ──────────────────────────────────────────────────────────

/// Progress report of one launch. Flags are set in pipeline order; a flag
/// left `false` marks the stage that aborted or was never reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StageStatus {
    pub success: bool,
    pub campaign_created: bool,
    pub ad_group_created: bool,
    pub product_ad_created: bool,
    pub bid_recommendations_received: bool,
    pub keyword_created: bool,
    pub message: String,
}

// ─── Lenient inbound parsing ───────────────────────────────────────────────

/// Form-driven clients send numbers as strings and keywords as one
/// comma-separated field.
mod lenient {
    use serde::de::{self, Deserializer};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(serde_json::Number),
        Text(String),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum KeywordInput {
        Text(String),
        List(Vec<String>),
    }

    /// `NaN` and infinities are rejected; they have no JSON encoding.
    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => n
                .as_f64()
                .ok_or_else(|| de::Error::custom("number out of range"))?,
            NumberOrText::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| de::Error::custom(format!("invalid number {s:?}: {e}")))?,
        };
        if !value.is_finite() {
            return Err(de::Error::custom(format!("number must be finite, got {value}")));
        }
        Ok(value)
    }

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => n.to_string(),
            NumberOrText::Text(s) => s,
        })
    }

    pub fn keyword_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match KeywordInput::deserialize(deserializer)? {
            KeywordInput::Text(s) => s.split(',').map(str::to_string).collect::<Vec<_>>(),
            KeywordInput::List(items) => items,
        };
        Ok(raw
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect())
    }
}
