use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_LAUNCH__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub ads: AdsApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

/// Connection settings for the remote advertising API.
#[derive(Debug, Clone, Deserialize)]
pub struct AdsApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for a single advertising API call in milliseconds.
    #[serde(default = "default_ads_timeout_ms")]
    pub timeout_ms: u64,
    /// Client identifier used when the caller does not send one.
    #[serde(default)]
    pub client_id: Option<String>,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_base_url() -> String {
    "https://advertising-api.amazon.com".to_string()
}
fn default_ads_timeout_ms() -> u64 {
    30_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for AdsApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_ads_timeout_ms(),
            client_id: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            ads: AdsApiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CAMPAIGN_LAUNCH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_production_api() {
        let config = AppConfig::default();
        assert_eq!(config.ads.base_url, "https://advertising-api.amazon.com");
        assert_eq!(config.ads.timeout_ms, 30_000);
        assert!(config.ads.client_id.is_none());
        assert_eq!(config.api.http_port, 8080);
    }

    #[test]
    fn test_partial_source_falls_back_to_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("ads.client_id", "amzn1.application-oa2-client.abc")
            .unwrap()
            .set_override("api.http_port", 9000)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(
            config.ads.client_id.as_deref(),
            Some("amzn1.application-oa2-client.abc")
        );
        assert_eq!(config.api.http_port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.node_id, "node-01");
    }
}
