//! Domain models for LabTrack.

pub mod dashboard;
pub mod sample;
pub mod test_result;
pub mod user;

// Re-export commonly used types
pub use dashboard::DashboardStats;
pub use sample::{
    CreateSampleRequest, SampleMutationResponse, SampleResponse, SampleStatus, SampleSummary,
    UpdateSampleStatusRequest,
};
pub use test_result::{
    CreateTestResultRequest, ListTestResultsQuery, TestResult, TestResultDetail,
    TestResultMutationResponse, TestStatus, TestType, UpdateTestResultRequest,
};
pub use user::{
    AuthResponse, LoginRequest, RegisterRequest, SessionClaims, User, UserResponse, UserRole,
    UserSummary,
};

/// Generic acknowledgement body (e.g. for deletes).
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
