//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LabTrack Server",
        version = "0.1.0",
        description = "Laboratory sample tracking with AI-assisted test result analysis"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        api::health::analysis_health,
        // Auth endpoints
        api::auth::register,
        api::auth::login,
        api::auth::me,
        // Sample endpoints
        api::samples::create_sample,
        api::samples::list_samples,
        api::samples::get_sample,
        api::samples::update_sample_status,
        api::samples::delete_sample,
        // Test result endpoints
        api::test_results::create_test_result,
        api::test_results::list_test_results,
        api::test_results::list_sample_test_results,
        api::test_results::get_test_result,
        api::test_results::update_test_result,
        api::test_results::retry_analysis,
        api::test_results::delete_test_result,
        // Dashboard endpoints
        api::dashboard::stats,
        api::dashboard::recent_samples,
        api::dashboard::recent_results,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::MessageResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            api::health::AnalysisHealthResponse,
            // Auth
            models::UserRole,
            models::UserResponse,
            models::UserSummary,
            models::RegisterRequest,
            models::LoginRequest,
            models::AuthResponse,
            // Samples
            models::SampleStatus,
            models::SampleSummary,
            models::SampleResponse,
            models::CreateSampleRequest,
            models::UpdateSampleStatusRequest,
            models::SampleMutationResponse,
            // Test results
            models::TestType,
            models::TestStatus,
            models::TestResult,
            models::TestResultDetail,
            models::CreateTestResultRequest,
            models::UpdateTestResultRequest,
            models::TestResultMutationResponse,
            // Dashboard
            models::DashboardStats,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration, login and session"),
        (name = "Samples", description = "Sample registry"),
        (name = "Test Results", description = "Test result lifecycle and AI analysis"),
        (name = "Dashboard", description = "Aggregate statistics")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add bearer token security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
