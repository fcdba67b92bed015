//! Transport seam between the gateway and the advertising API.
//!
//! The gateway builds fully-formed [`ApiRequest`]s (path, scope headers,
//! bearer token, JSON body); a transport only moves bytes and reports the
//! HTTP status back.

use async_trait::async_trait;
use launch_core::config::AdsApiConfig;
use launch_core::{LaunchError, LaunchResult, SessionContext};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

pub const CLIENT_ID_HEADER: &str = "Amazon-Advertising-API-ClientId";
pub const SCOPE_HEADER: &str = "Amazon-Advertising-API-Scope";
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// One call to the advertising API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Request scoped to an advertiser profile, carrying the session's
    /// client id and bearer token.
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        session: &SessionContext,
        profile_id: &str,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: vec![
                (CLIENT_ID_HEADER, session.client_id().to_string()),
                (SCOPE_HEADER, profile_id.to_string()),
                (AUTHORIZATION_HEADER, session.bearer()),
                (CONTENT_TYPE_HEADER, "application/json".to_string()),
            ],
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and decoded body of an advertising API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Decode the body into a typed response.
    pub fn json<T: DeserializeOwned>(&self) -> LaunchResult<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

/// Moves an [`ApiRequest`] to the advertising API.
#[async_trait]
pub trait AdsTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> LaunchResult<ApiResponse>;
}

/// reqwest-backed transport against the configured API base URL.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &AdsApiConfig) -> LaunchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| LaunchError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl AdsTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> LaunchResult<ApiResponse> {
        let start = Instant::now();
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| LaunchError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LaunchError::Transport(e.to_string()))?;

        // Error pages are not always JSON; only a successful body must decode.
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(e) if status.is_success() => return Err(e.into()),
                Err(_) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
            }
        };

        debug!(
            method = request.method.as_str(),
            path = %request.path,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Advertising API call finished"
        );

        Ok(ApiResponse::new(status.as_u16(), body))
    }
}
