//! Authentication: password hashing, session tokens and request extractors.

mod extractor;
pub mod password;
pub mod token;

use actix_web::HttpRequest;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::config::ADMIN_KEY_HEADER;

pub use extractor::{AuthError, AuthUser};
pub use token::SessionTokens;

/// Wrapper type for the bootstrap admin key (required to register ADMIN users).
/// Uses `SecretString` so the key is redacted in `Debug` and zeroized on drop.
#[derive(Clone)]
pub struct AdminKey(Option<SecretString>);

impl AdminKey {
    pub fn new(key: Option<SecretString>) -> Self {
        Self(key)
    }

    /// Compare the provided key with the stored admin key in constant time.
    ///
    /// Always false when no admin key is configured.
    pub fn verify(&self, provided: &str) -> bool {
        match &self.0 {
            Some(secret) => {
                let expected = secret.expose_secret();
                expected.as_bytes().ct_eq(provided.as_bytes()).into()
            }
            None => false,
        }
    }

    /// Check the `X-Admin-Key` header of a request.
    pub fn verify_request(&self, req: &HttpRequest) -> bool {
        req.headers()
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|provided| self.verify(provided))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "AdminKey([REDACTED])"),
            None => write!(f, "AdminKey(None)"),
        }
    }
}
