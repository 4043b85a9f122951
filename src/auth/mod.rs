use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub mod jwks;
pub mod scopes;
pub mod verifier;

pub use jwks::{HttpJwksFetcher, JwksCache, JwksError, JwksFetcher};
pub use scopes::authorize;
pub use verifier::TokenVerifier;

/// Claims carried by a verified bearer token. Reconstructed from the token on
/// every request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub aud: String,
    pub iss: String,
    pub exp: i64,
    /// Space-delimited granted scopes, e.g. `"read:books write:books"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Claims {
    /// Granted scopes as a set. Duplicates collapse, order is irrelevant.
    pub fn scopes(&self) -> HashSet<&str> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Why a bearer token was rejected. All variants surface as a generic 401.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("no signing key matches kid {0:?}")]
    UnknownKey(String),

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("token is expired")]
    Expired,

    #[error("audience mismatch")]
    AudienceMismatch,

    #[error("issuer mismatch")]
    IssuerMismatch,

    #[error(transparent)]
    KeySetUnavailable(#[from] JwksError),
}
