//! HTTP client for the hoax-detection analysis API.
//!
//! Three endpoints are used, all relative to the configured base URL:
//!
//! | Method | Path       | Body / response                         |
//! |--------|------------|-----------------------------------------|
//! | POST   | `/analyze` | `{"text": ...}` -> [`AnalysisResult`]  |
//! | GET    | `/history` | [`HistoryItem`] array                   |
//! | GET    | `/health`  | `{"status": "healthy"}`                 |
//!
//! Calls are never retried and carry no request timeout; an optional
//! connect timeout can be set on the builder.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{LensError, NetworkError, ValidationError};
use crate::model::{AnalysisRequest, AnalysisResult, HealthStatus, HistoryItem};

/// Client bound to one analysis API base URL. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    base_url: String,
    connect_timeout: Option<Duration>,
    http: reqwest::Client,
}

impl AnalysisClient {
    /// Start building a client aimed at `base_url` (e.g. `http://localhost:5000/api`).
    pub fn builder(base_url: impl Into<String>) -> AnalysisClientBuilder {
        AnalysisClientBuilder::new(base_url)
    }

    /// Shorthand for `builder(base_url).build()`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::builder(base_url).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Submit news text for classification.
    ///
    /// The text is trimmed first; blank input fails with
    /// [`ValidationError::EmptyText`] and no request is sent.
    ///
    /// # Errors
    /// - `LensError::Validation` when the trimmed text is empty.
    /// - `LensError::Network` on connection failure, non-2xx status or an
    ///   undecodable body.
    pub async fn submit_analysis(&self, text: &str) -> Result<AnalysisResult, LensError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText.into());
        }

        let url = self.endpoint("analyze");
        debug!(url = %url, chars = text.chars().count(), "submitting analysis");
        let body = AnalysisRequest { text: text.to_string() };
        let request = self.http.post(&url).json(&body);
        let result: AnalysisResult = self.send_json(request, url).await?;
        debug!(prediction = %result.prediction, confidence = result.confidence, "analysis received");
        Ok(result)
    }

    /// Fetch the server's recent analyses, newest first as the server orders them.
    pub async fn fetch_history(&self) -> Result<Vec<HistoryItem>, NetworkError> {
        let url = self.endpoint("history");
        debug!(url = %url, "fetching history");
        self.send_json(self.http.get(&url), url).await
    }

    /// Query the API's health endpoint.
    pub async fn check_health(&self) -> Result<HealthStatus, NetworkError> {
        let url = self.endpoint("health");
        self.send_json(self.http.get(&url), url).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: String,
    ) -> Result<T, NetworkError> {
        let resp = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "analysis API unreachable");
            NetworkError::Connect {
                url: url.clone(),
                detail: e.to_string(),
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "analysis API returned error status");
            return Err(NetworkError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| NetworkError::Connect {
            url: url.clone(),
            detail: e.to_string(),
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(url = %url, error = %e, "analysis API sent malformed JSON");
            NetworkError::Decode {
                url,
                detail: e.to_string(),
            }
        })
    }
}

/// Builder for [`AnalysisClient`].
///
/// ```rust,ignore
/// let client = AnalysisClient::builder("http://localhost:5000/api")
///     .connect_timeout(Duration::from_secs(3))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisClientBuilder {
    base_url: String,
    connect_timeout: Option<Duration>,
}

impl AnalysisClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self {
            base_url,
            connect_timeout: None,
        }
    }

    /// Bound only the TCP connect phase. Unset by default.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> AnalysisClient {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("hoax-lens/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        // A default client is an acceptable fallback if TLS init fails.
        let http = builder.build().unwrap_or_default();

        AnalysisClient {
            base_url: self.base_url,
            connect_timeout: self.connect_timeout,
            http,
        }
    }
}
