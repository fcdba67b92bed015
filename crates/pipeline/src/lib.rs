//! Single-keyword campaign launch pipeline: plan derivation, bid policy and
//! the staged orchestration over the advertising API gateway.

pub mod bids;
pub mod orchestrator;
pub mod plan;

pub use bids::{BidPolicy, BidResolver};
pub use orchestrator::{CampaignOrchestrator, Step};
pub use plan::{LaunchParams, PlanRow};
