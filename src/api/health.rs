//! Health check endpoints.

use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::services::TestResultLifecycle;

/// Health check response.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// Readiness check response.
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    status: &'static str,
    database: &'static str,
}

/// Analysis service reachability.
#[derive(Serialize, ToSchema)]
pub struct AnalysisHealthResponse {
    /// "healthy" or "unavailable"
    status: &'static str,
    healthy: bool,
}

/// Health check endpoint.
///
/// Returns 200 if the service is running.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check endpoint.
///
/// Returns 200 if the database answers a trivial query.
#[utoipa::path(
    get,
    path = "/api/v1/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service unavailable")
    )
)]
#[get("/ready")]
pub async fn ready(pool: web::Data<DbPool>) -> HttpResponse {
    let conn = pool.connection();
    let stmt = sea_orm::Statement::from_string(conn.get_database_backend(), "SELECT 1".to_owned());
    match conn.query_one_raw(stmt).await {
        Ok(_) => HttpResponse::Ok().json(ReadyResponse {
            status: "ready",
            database: "connected",
        }),
        Err(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "error": "NOT_READY",
            "message": "Database connection failed"
        })),
    }
}

/// Analysis service health.
///
/// Always 200; the body reports whether the analysis service is healthy.
/// Analysis failures never block test result submission.
#[utoipa::path(
    get,
    path = "/api/v1/health/analysis",
    tag = "Health",
    responses(
        (status = 200, description = "Analysis service status", body = AnalysisHealthResponse)
    )
)]
#[get("/health/analysis")]
pub async fn analysis_health(lifecycle: web::Data<TestResultLifecycle>) -> HttpResponse {
    let healthy = lifecycle.analysis().check_health().await;
    HttpResponse::Ok().json(AnalysisHealthResponse {
        status: if healthy { "healthy" } else { "unavailable" },
        healthy,
    })
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(ready).service(analysis_health);
}
