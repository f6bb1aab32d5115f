//! Sample registry endpoints.

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use super::LAB_WRITERS;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::db::samples::NewSample;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateSampleRequest, MessageResponse, SampleMutationResponse, SampleResponse,
    UpdateSampleStatusRequest, UserRole,
};

/// Load one sample with its creator and test results.
async fn load_sample(pool: &DbPool, id: Uuid) -> AppResult<SampleResponse> {
    let sample = pool
        .get_sample_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Sample".to_string()))?;

    pool.load_sample_responses(vec![sample])
        .await?
        .pop()
        .ok_or_else(|| AppError::Internal(format!("Sample {} vanished while loading", id)))
}

/// Register a new sample.
#[utoipa::path(
    post,
    path = "/api/v1/samples",
    tag = "Samples",
    request_body = CreateSampleRequest,
    responses(
        (status = 201, description = "Sample created", body = SampleMutationResponse),
        (status = 400, description = "Missing fields", body = crate::error::ErrorResponse),
        (status = 403, description = "Role not allowed", body = crate::error::ErrorResponse),
        (status = 409, description = "Barcode already registered", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn create_sample(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    body: web::Json<CreateSampleRequest>,
) -> AppResult<HttpResponse> {
    auth.require_role(LAB_WRITERS)?;
    let req = body.into_inner().normalized()?;

    if pool.get_sample_by_barcode(&req.barcode).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Sample with barcode {} already exists",
            req.barcode
        )));
    }

    let sample = pool
        .insert_sample(NewSample {
            barcode: req.barcode,
            patient_name: req.patient_name,
            patient_id: req.patient_id,
            created_by: auth.user_id,
        })
        .await?;

    info!(sample_id = %sample.id, barcode = %sample.barcode, "Sample registered");

    let sample = load_sample(&pool, sample.id).await?;
    Ok(HttpResponse::Created().json(SampleMutationResponse {
        message: "Sample created successfully".to_string(),
        sample,
    }))
}

/// List all samples, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/samples",
    tag = "Samples",
    responses(
        (status = 200, description = "Samples with creators and test results", body = Vec<SampleResponse>)
    ),
    security(("bearer" = []))
)]
pub async fn list_samples(_auth: AuthUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let samples = pool.list_samples(None).await?;
    let samples = pool.load_sample_responses(samples).await?;
    Ok(HttpResponse::Ok().json(samples))
}

/// Get a sample by ID.
#[utoipa::path(
    get,
    path = "/api/v1/samples/{id}",
    tag = "Samples",
    params(
        ("id" = Uuid, Path, description = "Sample ID")
    ),
    responses(
        (status = 200, description = "Sample", body = SampleResponse),
        (status = 404, description = "Sample not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn get_sample(
    _auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let sample = load_sample(&pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(sample))
}

/// Move a sample to another status.
#[utoipa::path(
    patch,
    path = "/api/v1/samples/{id}/status",
    tag = "Samples",
    params(
        ("id" = Uuid, Path, description = "Sample ID")
    ),
    request_body = UpdateSampleStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = SampleMutationResponse),
        (status = 404, description = "Sample not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn update_sample_status(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateSampleStatusRequest>,
) -> AppResult<HttpResponse> {
    auth.require_role(LAB_WRITERS)?;
    let id = path.into_inner();

    pool.update_sample_status(id, body.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Sample".to_string()))?;

    info!(sample_id = %id, status = %body.status, "Sample status updated");

    let sample = load_sample(&pool, id).await?;
    Ok(HttpResponse::Ok().json(SampleMutationResponse {
        message: "Sample status updated successfully".to_string(),
        sample,
    }))
}

/// Delete a sample and its test results.
#[utoipa::path(
    delete,
    path = "/api/v1/samples/{id}",
    tag = "Samples",
    params(
        ("id" = Uuid, Path, description = "Sample ID")
    ),
    responses(
        (status = 200, description = "Sample deleted", body = MessageResponse),
        (status = 403, description = "Only admins may delete", body = crate::error::ErrorResponse),
        (status = 404, description = "Sample not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn delete_sample(
    auth: AuthUser,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    auth.require_role(&[UserRole::Admin])?;
    let id = path.into_inner();

    if !pool.delete_sample(id).await? {
        return Err(AppError::NotFound("Sample".to_string()));
    }

    info!(sample_id = %id, "Sample deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Sample deleted successfully")))
}

/// Configure sample routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/samples")
            .route(web::post().to(create_sample))
            .route(web::get().to(list_samples)),
    )
    .service(
        web::resource("/samples/{id}")
            .route(web::get().to(get_sample))
            .route(web::delete().to(delete_sample)),
    )
    .service(web::resource("/samples/{id}/status").route(web::patch().to(update_sample_status)));
}
