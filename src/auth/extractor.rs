//! Actix-web extractors for session authentication.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use std::future::{Ready, ready};
use tracing::debug;
use uuid::Uuid;

use super::SessionTokens;
use crate::error::{AppError, ErrorResponse};
use crate::models::UserRole;

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl AuthError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authenticated user, taken from a verified session token.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> AppResult<HttpResponse> {
///     auth.require_role(&[UserRole::Admin])?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    /// Fail with 403 unless the caller has one of `roles`.
    pub fn require_role(&self, roles: &[UserRole]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Role {} may not perform this action",
                self.role
            )))
        }
    }
}

impl FromRequest for AuthUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(tokens) = req.app_data::<web::Data<SessionTokens>>() else {
            return ready(Err(AuthError::new("Internal configuration error")));
        };

        let Some(token) = bearer_token(req) else {
            return ready(Err(AuthError::new(
                "Missing session token. Provide Authorization: Bearer header.",
            )));
        };

        let claims = match tokens.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("Rejected session token: {}", e);
                return ready(Err(AuthError::new("Invalid or expired session token")));
            }
        };

        let (Ok(user_id), Some(role)) = (
            Uuid::parse_str(&claims.user_id),
            UserRole::parse(&claims.role),
        ) else {
            return ready(Err(AuthError::new("Invalid or expired session token")));
        };

        ready(Ok(AuthUser {
            user_id,
            email: claims.email,
            role,
        }))
    }
}
