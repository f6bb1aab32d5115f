//! API endpoint modules.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod openapi;
pub mod samples;
pub mod test_results;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};

use crate::error::AppError;
use crate::models::UserRole;

pub use auth::configure_routes as configure_auth_routes;
pub use dashboard::configure_routes as configure_dashboard_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use samples::configure_routes as configure_sample_routes;
pub use test_results::configure_routes as configure_test_results_routes;

/// Roles allowed to create and modify lab records.
pub const LAB_WRITERS: &[UserRole] = &[UserRole::Technician, UserRole::Admin];

/// JSON body config that reports malformed bodies as `INVALID_INPUT`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        AppError::InvalidInput(err.to_string()).into()
    })
}

/// Path parameter config: a malformed id is `INVALID_INPUT`, not a bare 404.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        AppError::InvalidInput(format!("invalid path parameter: {}", err)).into()
    })
}

/// Query string config reporting bad filters as `INVALID_INPUT`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        AppError::InvalidInput(format!("invalid query string: {}", err)).into()
    })
}

/// Mount every `/api/v1` route group.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .configure(configure_health_routes)
        .configure(configure_auth_routes)
        .configure(configure_sample_routes)
        .configure(configure_test_results_routes)
        .configure(configure_dashboard_routes);
}
