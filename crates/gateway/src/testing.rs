//! In-memory transport for tests: replays scripted responses per path and
//! records every request it receives.

use crate::transport::{AdsTransport, ApiRequest, ApiResponse};
use async_trait::async_trait;
use launch_core::{LaunchError, LaunchResult};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next call to `path`. Responses for the same
    /// path are replayed in the order they were queued.
    pub fn respond(&self, path: &str, status: u16, body: Value) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_string())
            .or_default()
            .push_back(ApiResponse::new(status, body));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

#[async_trait]
impl AdsTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> LaunchResult<ApiResponse> {
        let path = request.path.clone();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&path)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| LaunchError::Transport(format!("connection refused: {path}")))
    }
}
