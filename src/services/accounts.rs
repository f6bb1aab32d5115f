//! User registration and login.

use tokio::task::spawn_blocking;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::SessionTokens;
use crate::auth::password::{self, MIN_PASSWORD_LEN};
use crate::db::DbPool;
use crate::db::users::{self, NewUser};
use crate::error::{AppError, AppResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserResponse, UserRole};

/// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Account operations backed by the users table.
#[derive(Clone)]
pub struct AccountService {
    pool: DbPool,
    tokens: SessionTokens,
    password_iterations: u32,
}

impl AccountService {
    pub fn new(pool: DbPool, tokens: SessionTokens, password_iterations: u32) -> Self {
        Self {
            pool,
            tokens,
            password_iterations,
        }
    }

    /// Create a user and return a session for it.
    ///
    /// `admin_authorized` must be true to create an ADMIN.
    pub async fn register(
        &self,
        req: RegisterRequest,
        admin_authorized: bool,
    ) -> AppResult<AuthResponse> {
        let email = normalize_email(&req.email)?;
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("name is required".to_string()));
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let role = req.role.unwrap_or_default();
        if role == UserRole::Admin && !admin_authorized {
            warn!(email = %email, "Rejected ADMIN registration without admin key");
            return Err(AppError::Forbidden(
                "Registering an ADMIN requires a valid admin key".to_string(),
            ));
        }

        let conn = self.pool.connection();
        if users::find_by_email(conn, &email).await?.is_some() {
            return Err(AppError::Conflict(format!("User {} already exists", email)));
        }

        let iterations = self.password_iterations;
        let plain = req.password;
        let hashing = spawn_blocking(move || password::hash_password(&plain, iterations));
        let password_hash = hashing
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;
        let user = users::insert(
            conn,
            NewUser {
                email: &email,
                name,
                role,
                password_hash,
            },
        )
        .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");

        let token = self.tokens.issue(&user)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Verify credentials and issue a session token.
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        let email = req.email.trim().to_lowercase();

        let Some(user) = users::find_by_email(self.pool.connection(), &email).await? else {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let stored = user.password_hash.clone();
        let valid = spawn_blocking(move || password::verify_password(&req.password, &stored))
            .await
            .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))?;

        if !valid {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.tokens.issue(&user)?;
        Ok(AuthResponse {
            user: user.into(),
            token,
        })
    }

    /// Look up the current user.
    pub async fn current_user(&self, user_id: Uuid) -> AppResult<UserResponse> {
        users::find_by_id(self.pool.connection(), user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }
}

fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::InvalidInput("a valid email is required".to_string())),
    }
}
