//! Sample registry models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::sample;
use crate::error::{AppError, AppResult};
use crate::models::test_result::TestResult;
use crate::models::user::UserSummary;

/// Workflow status of a physical sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleStatus {
    Registered,
    InProgress,
    Completed,
    Rejected,
}

impl SampleStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "REGISTERED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "REGISTERED" => Some(Self::Registered),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sample fields shared by every sample view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SampleSummary {
    pub id: Uuid,
    pub barcode: String,
    pub patient_name: String,
    pub patient_id: String,
    pub status: SampleStatus,
    /// User who registered the sample (absent if the user no longer exists)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SampleSummary {
    pub fn from_model(m: sample::Model, created_by: Option<UserSummary>) -> AppResult<Self> {
        let status = SampleStatus::parse(&m.status).ok_or_else(|| {
            AppError::Database(format!("Unknown sample status '{}' on {}", m.status, m.id))
        })?;

        Ok(SampleSummary {
            id: m.id,
            barcode: m.barcode,
            patient_name: m.patient_name,
            patient_id: m.patient_id,
            status,
            created_by,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// Sample with its test results.
#[derive(Debug, Serialize, ToSchema)]
pub struct SampleResponse {
    #[serde(flatten)]
    pub sample: SampleSummary,
    pub test_results: Vec<TestResult>,
}

/// Request to register a new sample.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSampleRequest {
    pub barcode: String,
    #[serde(alias = "patientName")]
    pub patient_name: String,
    #[serde(alias = "patientId")]
    pub patient_id: String,
}

impl CreateSampleRequest {
    /// Trim fields and reject blanks.
    pub fn normalized(self) -> AppResult<Self> {
        let barcode = self.barcode.trim().to_string();
        let patient_name = self.patient_name.trim().to_string();
        let patient_id = self.patient_id.trim().to_string();

        for (field, value) in [
            ("barcode", &barcode),
            ("patient_name", &patient_name),
            ("patient_id", &patient_id),
        ] {
            if value.is_empty() {
                return Err(AppError::InvalidInput(format!("{} is required", field)));
            }
        }

        Ok(Self {
            barcode,
            patient_name,
            patient_id,
        })
    }
}

/// Request to move a sample to another status.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSampleStatusRequest {
    pub status: SampleStatus,
}

/// Response for sample creation and status updates.
#[derive(Debug, Serialize, ToSchema)]
pub struct SampleMutationResponse {
    pub message: String,
    pub sample: SampleResponse,
}
