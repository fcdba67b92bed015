//! Campaign Launch: single-keyword Sponsored Products campaign launcher.
//!
//! Main entry point that wires the advertising API gateway into the launch
//! pipeline and starts the server.

use clap::Parser;
use launch_api::ApiServer;
use launch_core::config::AppConfig;
use launch_gateway::{AdsGateway, HttpTransport};
use launch_pipeline::CampaignOrchestrator;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "campaign-launch")]
#[command(about = "Single-keyword Sponsored Products campaign launcher")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "CAMPAIGN_LAUNCH__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CAMPAIGN_LAUNCH__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Advertising API base URL (overrides config)
    #[arg(long, env = "CAMPAIGN_LAUNCH__ADS__BASE_URL")]
    ads_base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "campaign_launch=info,launch_pipeline=info,launch_gateway=info,tower_http=info"
                    .into()
            }),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Campaign Launch starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(base_url) = cli.ads_base_url {
        config.ads.base_url = base_url;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        ads_base_url = %config.ads.base_url,
        ads_timeout_ms = config.ads.timeout_ms,
        "Configuration loaded"
    );

    let transport = Arc::new(HttpTransport::new(&config.ads)?);
    let orchestrator = Arc::new(CampaignOrchestrator::new(AdsGateway::new(transport)));

    let api_server = ApiServer::new(config.clone(), orchestrator);

    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Campaign Launch is ready to serve traffic");

    // Blocks until shutdown.
    api_server.start_http().await?;

    Ok(())
}
