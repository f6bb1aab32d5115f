//! Dashboard endpoints.

use actix_web::{HttpResponse, web};

use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{DashboardStats, SampleResponse, TestResult};
use crate::services::TestResultLifecycle;

/// Number of entries in the "recent" lists.
const RECENT_LIMIT: u64 = 5;

/// Aggregate sample and test result counters.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats)
    ),
    security(("bearer" = []))
)]
pub async fn stats(_auth: AuthUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let total_samples = pool.count_samples().await?;
    let counts = pool.count_test_results_by_status().await?;

    Ok(HttpResponse::Ok().json(DashboardStats::new(
        total_samples,
        counts.pending + counts.in_progress,
        counts.completed,
        counts.failed,
    )))
}

/// The most recently registered samples.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/recent-samples",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Recent samples", body = Vec<SampleResponse>)
    ),
    security(("bearer" = []))
)]
pub async fn recent_samples(_auth: AuthUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let samples = pool.list_samples(Some(RECENT_LIMIT)).await?;
    let samples = pool.load_sample_responses(samples).await?;
    Ok(HttpResponse::Ok().json(samples))
}

/// The most recently submitted test results.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/recent-results",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Recent test results", body = Vec<TestResult>)
    ),
    security(("bearer" = []))
)]
pub async fn recent_results(
    _auth: AuthUser,
    lifecycle: web::Data<TestResultLifecycle>,
) -> AppResult<HttpResponse> {
    let results = lifecycle.recent(RECENT_LIMIT).await?;
    Ok(HttpResponse::Ok().json(results))
}

/// Configure dashboard routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/dashboard/stats").route(web::get().to(stats)))
        .service(web::resource("/dashboard/recent-samples").route(web::get().to(recent_samples)))
        .service(web::resource("/dashboard/recent-results").route(web::get().to(recent_results)));
}
