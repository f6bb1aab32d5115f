//! Account endpoints: register, login and current user.

use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::{AdminKey, AuthUser};
use crate::error::AppResult;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::services::AccountService;

/// Register a user.
///
/// ADMIN accounts require the `X-Admin-Key` header.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin key required", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    req: HttpRequest,
    accounts: web::Data<AccountService>,
    admin_key: web::Data<AdminKey>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let admin_authorized = admin_key.verify_request(&req);
    let response = accounts
        .register(body.into_inner(), admin_authorized)
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    accounts: web::Data<AccountService>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let response = accounts.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Get the authenticated user.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn me(auth: AuthUser, accounts: web::Data<AccountService>) -> AppResult<HttpResponse> {
    let user = accounts.current_user(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Configure auth routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/auth/register").route(web::post().to(register)))
        .service(web::resource("/auth/login").route(web::post().to(login)))
        .service(web::resource("/auth/me").route(web::get().to(me)));
}
