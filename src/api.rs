//! REST client for the diagram and debugger endpoints.
//!
//! [`EngineApi`] is the seam the debugger session talks through. The HTTP
//! implementation is a thin wrapper; URL building and response parsing are
//! pure functions so they can be tested without a server.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use canvas::model::Snapshot;
use serde_json::Value;

use crate::config::ViewerConfig;
use crate::error::ErrorCode;
use crate::source::DiagramSource;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16, body: String },

    /// The response body is not what the endpoint promises.
    #[error("response parse failed: {0}")]
    Parse(String),
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_API_REQUEST",
            Self::Status { .. } => "E_API_STATUS",
            Self::Parse(_) => "E_API_PARSE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// SEAM
// =============================================================================

/// Side panels refreshed after a plan item is continued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshKind {
    EventLog,
    Variables,
    PlanItems,
    CaseTasks,
}

impl RefreshKind {
    pub const ALL: [Self; 4] = [Self::EventLog, Self::Variables, Self::PlanItems, Self::CaseTasks];

    #[must_use]
    pub fn segment(self) -> &'static str {
        match self {
            Self::EventLog => "event-log",
            Self::Variables => "variables",
            Self::PlanItems => "plan-items",
            Self::CaseTasks => "case-tasks",
        }
    }
}

#[async_trait::async_trait]
pub trait EngineApi: Send + Sync {
    /// Fetch a fresh snapshot, bypassing caches.
    async fn fetch_model(&self, source: &DiagramSource) -> Result<Snapshot, ApiError>;

    async fn add_breakpoint(&self, element_id: &str) -> Result<(), ApiError>;

    async fn remove_breakpoint(&self, element_id: &str) -> Result<(), ApiError>;

    async fn continue_plan_item(&self, plan_item_id: &str) -> Result<(), ApiError>;

    /// Read one side panel's data. The payload is handed on untouched.
    async fn fetch_refresh(&self, kind: RefreshKind, instance_id: &str) -> Result<Value, ApiError>;
}

// =============================================================================
// URLS
// =============================================================================

#[must_use]
pub fn breakpoints_url(base_url: &str) -> String {
    format!("{}/app/rest/debugger/breakpoints", base_url.trim_end_matches('/'))
}

#[must_use]
pub fn continue_url(base_url: &str, plan_item_id: &str) -> String {
    format!("{}/app/rest/debugger/plan-items/{plan_item_id}/continue", base_url.trim_end_matches('/'))
}

#[must_use]
pub fn refresh_url(base_url: &str, kind: RefreshKind, instance_id: &str) -> String {
    format!(
        "{}/app/rest/debugger/instances/{instance_id}/{}",
        base_url.trim_end_matches('/'),
        kind.segment()
    )
}

/// Request body for both breakpoint verbs.
#[must_use]
pub fn breakpoint_body(element_id: &str) -> Value {
    serde_json::json!({ "elementId": element_id })
}

/// Current time as milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis())
}

// =============================================================================
// PARSING
// =============================================================================

fn check_status(status: u16, body: String) -> Result<String, ApiError> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(ApiError::Status { status, body })
    }
}

/// Parse a model-json response into a snapshot.
///
/// # Errors
///
/// Non-2xx status, or a body that is not a snapshot.
pub fn parse_snapshot(status: u16, body: String) -> Result<Snapshot, ApiError> {
    let text = check_status(status, body)?;
    serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Parse a refresh response. An empty body reads as `null`.
///
/// # Errors
///
/// Non-2xx status, or a body that is not JSON.
pub fn parse_payload(status: u16, body: String) -> Result<Value, ApiError> {
    let text = check_status(status, body)?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpEngineApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEngineApi {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ViewerConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, String), ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        Ok((status, text))
    }

    async fn send_empty(&self, request: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let (status, body) = self.send(request).await?;
        check_status(status, body).map(drop)
    }
}

#[async_trait::async_trait]
impl EngineApi for HttpEngineApi {
    async fn fetch_model(&self, source: &DiagramSource) -> Result<Snapshot, ApiError> {
        let url = source.url(&self.base_url, now_millis());
        tracing::debug!(%source, %url, "fetching diagram");
        let (status, body) = self.send(self.http.get(url)).await?;
        parse_snapshot(status, body)
    }

    async fn add_breakpoint(&self, element_id: &str) -> Result<(), ApiError> {
        let request = self.http.post(breakpoints_url(&self.base_url)).json(&breakpoint_body(element_id));
        self.send_empty(request).await
    }

    async fn remove_breakpoint(&self, element_id: &str) -> Result<(), ApiError> {
        let request = self.http.delete(breakpoints_url(&self.base_url)).json(&breakpoint_body(element_id));
        self.send_empty(request).await
    }

    async fn continue_plan_item(&self, plan_item_id: &str) -> Result<(), ApiError> {
        self.send_empty(self.http.put(continue_url(&self.base_url, plan_item_id))).await
    }

    async fn fetch_refresh(&self, kind: RefreshKind, instance_id: &str) -> Result<Value, ApiError> {
        let (status, body) = self.send(self.http.get(refresh_url(&self.base_url, kind, instance_id))).await?;
        parse_payload(status, body)
    }
}
