//! Session JWTs (HS256).

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};

use crate::config::AuthSettings;
use crate::error::{AppError, AppResult};
use crate::models::{SessionClaims, User};

/// Issuer claim for session tokens.
pub const SESSION_ISSUER: &str = "labtrack";

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct SessionTokens {
    secret: SecretString,
    ttl_secs: u64,
}

impl SessionTokens {
    pub fn new(secret: SecretString, ttl_secs: u64) -> Self {
        Self { secret, ttl_secs }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(settings.jwt_secret.clone(), settings.token_ttl_secs)
    }

    /// Create a signed token for a user.
    pub fn issue(&self, user: &User) -> AppResult<String> {
        let now = chrono::Utc::now();
        let exp = i64::try_from(self.ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::Internal(format!("Invalid session TTL: {}s", self.ttl_secs))
            })?;

        let claims = SessionClaims {
            sub: user.id.to_string(),
            iss: SESSION_ISSUER.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            user_id: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
        };

        let key = EncodingKey::from_secret(self.secret.expose_secret().as_bytes());
        encode(&Header::new(Algorithm::HS256), &claims, &key)
            .map_err(|e| AppError::Internal(format!("Failed to create session token: {}", e)))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, String> {
        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);
        validation.validate_aud = false;

        let token_data = decode::<SessionClaims>(token, &key, &validation)
            .map_err(|e| format!("Invalid session token: {}", e))?;

        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}
