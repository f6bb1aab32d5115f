//! Test result domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::test_result;
use crate::error::{AppError, AppResult};
use crate::models::sample::SampleSummary;

/// Kind of laboratory test. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestType {
    BloodCount,
    Biochemistry,
    Urinalysis,
    Microbiology,
}

impl TestType {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BloodCount => "BLOOD_COUNT",
            Self::Biochemistry => "BIOCHEMISTRY",
            Self::Urinalysis => "URINALYSIS",
            Self::Microbiology => "MICROBIOLOGY",
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BLOOD_COUNT" => Some(Self::BloodCount),
            "BIOCHEMISTRY" => Some(Self::Biochemistry),
            "URINALYSIS" => Some(Self::Urinalysis),
            "MICROBIOLOGY" => Some(Self::Microbiology),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a test result.
///
/// `PENDING` on creation, `IN_PROGRESS` after a raw-data update, then
/// `COMPLETED` or `FAILED` once the analysis attempt returns. Neither of the
/// last two is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TestStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A test result as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TestResult {
    pub id: Uuid,
    pub sample_id: Uuid,
    pub test_type: TestType,
    /// Caller-supplied measurements (opaque JSON object)
    #[schema(value_type = Object)]
    pub raw_data: JsonValue,
    /// Analysis service output; only present when status is COMPLETED
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub ai_analysis: Option<JsonValue>,
    pub status: TestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<test_result::Model> for TestResult {
    type Error = AppError;

    fn try_from(m: test_result::Model) -> AppResult<Self> {
        let test_type = TestType::parse(&m.test_type).ok_or_else(|| {
            AppError::Database(format!("Unknown test type '{}' on {}", m.test_type, m.id))
        })?;
        let status = TestStatus::parse(&m.status).ok_or_else(|| {
            AppError::Database(format!("Unknown test status '{}' on {}", m.status, m.id))
        })?;

        Ok(TestResult {
            id: m.id,
            sample_id: m.sample_id,
            test_type,
            raw_data: m.raw_data,
            ai_analysis: m.ai_analysis,
            status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// Test result with its owning sample (GET /test-results/{id}).
#[derive(Debug, Serialize, ToSchema)]
pub struct TestResultDetail {
    #[serde(flatten)]
    pub test_result: TestResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<SampleSummary>,
}

/// Request to submit a new test result.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestResultRequest {
    #[serde(alias = "sampleId")]
    pub sample_id: Uuid,
    #[serde(alias = "testType")]
    pub test_type: TestType,
    #[serde(alias = "rawData")]
    #[schema(value_type = Object)]
    pub raw_data: JsonValue,
}

/// Request to replace the raw data of an existing test result.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestResultRequest {
    #[serde(alias = "rawData")]
    #[schema(value_type = Object)]
    pub raw_data: JsonValue,
}

/// Query parameters for listing test results.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListTestResultsQuery {
    /// Only return results for this sample.
    pub sample_id: Option<Uuid>,
}

/// Response for submit, update and re-analysis.
///
/// The request itself succeeded whenever this body is returned;
/// `analysis_completed` tells whether the analysis attempt did.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestResultMutationResponse {
    pub message: String,
    pub analysis_completed: bool,
    pub test_result: TestResult,
}

/// Ensure an opaque payload is a JSON object.
pub fn require_json_object(value: &JsonValue, field: &str) -> AppResult<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "{} must be a JSON object",
            field
        )))
    }
}
