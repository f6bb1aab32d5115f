//! Client for the external AI analysis service.
//!
//! The service is a black box reached over HTTP:
//! - `POST {base}/analyze` with `{test_type, raw_data}` returns the analysis document
//! - `GET {base}/health` returns `{status}`, healthy iff `status == "healthy"`
//!
//! Failures never surface as errors to callers. `analyze` retries with linear
//! backoff and then reports a typed [`AnalysisOutcome`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::AnalysisSettings;
use crate::error::{AppError, AppResult};
use crate::models::TestType;

/// HTTP connect timeout for the analysis service.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Why an analysis attempt did not produce a usable document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisFailure {
    #[error("analysis service unreachable: {0}")]
    Transport(String),

    #[error("analysis request timed out")]
    Timeout,

    #[error("analysis service returned HTTP {0}")]
    Status(u16),

    #[error("invalid analysis response: {0}")]
    InvalidBody(String),
}

/// Result of one analysis request (including client-side retries).
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The service returned this JSON object.
    Completed(JsonValue),
    /// Every attempt failed; carries the last failure.
    Failed(AnalysisFailure),
}

impl AnalysisOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// The analysis backend as seen by the lifecycle manager.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Analyze raw test data.
    async fn analyze(&self, test_type: TestType, raw_data: &JsonValue) -> AnalysisOutcome;

    /// Report whether the service considers itself healthy.
    async fn check_health(&self) -> bool;
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    test_type: TestType,
    raw_data: &'a JsonValue,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

/// reqwest-backed [`AnalysisService`].
#[derive(Clone)]
pub struct HttpAnalysisClient {
    http_client: reqwest::Client,
    analyze_url: String,
    health_url: String,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl HttpAnalysisClient {
    pub fn new(settings: &AnalysisSettings) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(settings.request_timeout))
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| {
                AppError::Internal(format!("Failed to build HTTP client for analysis: {}", e))
            })?;

        let base = settings.base_url.trim_end_matches('/');

        Ok(Self {
            http_client,
            analyze_url: format!("{}/analyze", base),
            health_url: format!("{}/health", base),
            retry_attempts: settings.retry_attempts.max(1),
            retry_delay: settings.retry_delay,
        })
    }

    /// Wait before the next attempt after `failures` consecutive failures.
    fn backoff(&self, failures: u32) -> Duration {
        self.retry_delay * failures
    }

    async fn attempt(&self, body: &AnalyzeRequest<'_>) -> Result<JsonValue, AnalysisFailure> {
        let response = self
            .http_client
            .post(&self.analyze_url)
            .json(body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisFailure::Status(status.as_u16()));
        }

        let document: JsonValue = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AnalysisFailure::Timeout
            } else {
                AnalysisFailure::InvalidBody(e.to_string())
            }
        })?;

        if !document.is_object() {
            return Err(AnalysisFailure::InvalidBody(
                "expected a JSON object".to_string(),
            ));
        }

        Ok(document)
    }
}

fn classify(e: reqwest::Error) -> AnalysisFailure {
    if e.is_timeout() {
        AnalysisFailure::Timeout
    } else {
        AnalysisFailure::Transport(e.to_string())
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, test_type: TestType, raw_data: &JsonValue) -> AnalysisOutcome {
        let body = AnalyzeRequest {
            test_type,
            raw_data,
        };

        let mut failures = 0;
        loop {
            match self.attempt(&body).await {
                Ok(document) => {
                    debug!(test_type = %test_type, attempts = failures + 1, "Analysis succeeded");
                    return AnalysisOutcome::Completed(document);
                }
                Err(failure) => {
                    failures += 1;
                    warn!(
                        test_type = %test_type,
                        attempt = failures,
                        max_attempts = self.retry_attempts,
                        "Analysis attempt failed: {}",
                        failure
                    );

                    if failures >= self.retry_attempts {
                        return AnalysisOutcome::Failed(failure);
                    }
                    tokio::time::sleep(self.backoff(failures)).await;
                }
            }
        }
    }

    async fn check_health(&self) -> bool {
        let response = match self.http_client.get(&self.health_url).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!("Analysis health check returned HTTP {}", r.status());
                return false;
            }
            Err(e) => {
                warn!("Analysis health check failed: {}", e);
                return false;
            }
        };

        match response.json::<HealthResponse>().await {
            Ok(health) => health.status == "healthy",
            Err(e) => {
                warn!("Analysis health check returned an invalid body: {}", e);
                false
            }
        }
    }
}
