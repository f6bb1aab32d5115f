//! Test result endpoints: submission, re-analysis and queries.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use super::LAB_WRITERS;
use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::models::{
    CreateTestResultRequest, ListTestResultsQuery, MessageResponse, TestResult, TestResultDetail,
    TestResultMutationResponse, UpdateTestResultRequest, UserRole,
};
use crate::services::TestResultLifecycle;

/// Submit a test result and analyze it.
///
/// Returns 201 whether or not the analysis succeeded; check `analysis_completed`.
#[utoipa::path(
    post,
    path = "/api/v1/test-results",
    tag = "Test Results",
    request_body = CreateTestResultRequest,
    responses(
        (status = 201, description = "Test result created", body = TestResultMutationResponse),
        (status = 400, description = "Invalid input or unknown sample", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Role not allowed", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn create_test_result(
    auth: AuthUser,
    lifecycle: web::Data<TestResultLifecycle>,
    body: web::Json<CreateTestResultRequest>,
) -> AppResult<HttpResponse> {
    auth.require_role(LAB_WRITERS)?;
    let req = body.into_inner();

    let response = lifecycle
        .submit(req.sample_id, req.test_type, req.raw_data)
        .await?;

    Ok(HttpResponse::Created().json(response))
}

/// List test results, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/test-results",
    tag = "Test Results",
    params(
        ("sample_id" = Option<Uuid>, Query, description = "Only results for this sample")
    ),
    responses(
        (status = 200, description = "Test results", body = Vec<TestResult>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn list_test_results(
    _auth: AuthUser,
    lifecycle: web::Data<TestResultLifecycle>,
    query: web::Query<ListTestResultsQuery>,
) -> AppResult<HttpResponse> {
    let results = lifecycle.list(query.sample_id).await?;
    Ok(HttpResponse::Ok().json(results))
}

/// List the test results of one sample, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/test-results/sample/{sample_id}",
    tag = "Test Results",
    params(
        ("sample_id" = Uuid, Path, description = "Sample ID")
    ),
    responses(
        (status = 200, description = "Test results of the sample", body = Vec<TestResult>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn list_sample_test_results(
    _auth: AuthUser,
    lifecycle: web::Data<TestResultLifecycle>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let results = lifecycle.list(Some(path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(results))
}

/// Get a test result with its sample.
#[utoipa::path(
    get,
    path = "/api/v1/test-results/{id}",
    tag = "Test Results",
    params(
        ("id" = Uuid, Path, description = "Test result ID")
    ),
    responses(
        (status = 200, description = "Test result", body = TestResultDetail),
        (status = 404, description = "Test result not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn get_test_result(
    _auth: AuthUser,
    lifecycle: web::Data<TestResultLifecycle>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = lifecycle.get_detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Replace the raw data of a test result and re-analyze it.
#[utoipa::path(
    put,
    path = "/api/v1/test-results/{id}",
    tag = "Test Results",
    params(
        ("id" = Uuid, Path, description = "Test result ID")
    ),
    request_body = UpdateTestResultRequest,
    responses(
        (status = 200, description = "Test result updated", body = TestResultMutationResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Test result not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn update_test_result(
    auth: AuthUser,
    lifecycle: web::Data<TestResultLifecycle>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTestResultRequest>,
) -> AppResult<HttpResponse> {
    auth.require_role(LAB_WRITERS)?;

    let response = lifecycle
        .update_raw_data(path.into_inner(), body.into_inner().raw_data)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Re-run analysis on the stored raw data.
#[utoipa::path(
    post,
    path = "/api/v1/test-results/{id}/analyze",
    tag = "Test Results",
    params(
        ("id" = Uuid, Path, description = "Test result ID")
    ),
    responses(
        (status = 200, description = "Analysis attempted", body = TestResultMutationResponse),
        (status = 404, description = "Test result not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn retry_analysis(
    auth: AuthUser,
    lifecycle: web::Data<TestResultLifecycle>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    auth.require_role(LAB_WRITERS)?;

    let response = lifecycle.retry_analysis(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Delete a test result.
#[utoipa::path(
    delete,
    path = "/api/v1/test-results/{id}",
    tag = "Test Results",
    params(
        ("id" = Uuid, Path, description = "Test result ID")
    ),
    responses(
        (status = 200, description = "Test result deleted", body = MessageResponse),
        (status = 403, description = "Only admins may delete", body = crate::error::ErrorResponse),
        (status = 404, description = "Test result not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn delete_test_result(
    auth: AuthUser,
    lifecycle: web::Data<TestResultLifecycle>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    auth.require_role(&[UserRole::Admin])?;

    lifecycle.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Test result deleted successfully")))
}

/// Configure test result routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/test-results")
            .route(web::post().to(create_test_result))
            .route(web::get().to(list_test_results)),
    )
    // Registered before /{id} so "sample" is not parsed as an ID
    .service(
        web::resource("/test-results/sample/{sample_id}")
            .route(web::get().to(list_sample_test_results)),
    )
    .service(
        web::resource("/test-results/{id}")
            .route(web::get().to(get_test_result))
            .route(web::put().to(update_test_result))
            .route(web::patch().to(update_test_result))
            .route(web::delete().to(delete_test_result)),
    )
    .service(web::resource("/test-results/{id}/analyze").route(web::post().to(retry_analysis)));
}
