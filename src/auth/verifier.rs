use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use crate::auth::jwks::{HttpJwksFetcher, JwksCache, JwksFetcher};
use crate::auth::{Claims, VerificationError};
use crate::config::AuthConfig;

/// Verifies RS256 bearer tokens against the identity provider's key set.
pub struct TokenVerifier {
    audience: String,
    issuer: String,
    jwks: JwksCache,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_fetcher(config, Box::new(HttpJwksFetcher::new(config.jwks_url())))
    }

    /// Construct with a custom key set source. Tests inject a fake fetcher
    /// here instead of hitting a real JWKS endpoint.
    pub fn with_fetcher(config: &AuthConfig, fetcher: Box<dyn JwksFetcher>) -> Self {
        Self {
            audience: config.audience.clone(),
            issuer: config.issuer.clone(),
            jwks: JwksCache::new(fetcher),
        }
    }

    /// Validate a bearer token and return its claims.
    ///
    /// Steps: decode the header, gate on RS256, resolve the kid through the
    /// key cache (fetching on a miss), then verify the signature and the
    /// exp/aud/iss claims in one `decode` pass.
    pub async fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let header =
            decode_header(token).map_err(|e| VerificationError::Malformed(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(VerificationError::UnsupportedAlgorithm(format!(
                "{:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| VerificationError::Malformed("missing key id".to_string()))?;

        let key = self
            .jwks
            .decoding_key(&kid)
            .await?
            .ok_or(VerificationError::UnknownKey(kid))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);
        // Expiry must be strictly in the future; no clock-skew tolerance.
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &key, &validation).map_err(map_decode_error)?;
        Ok(token_data.claims)
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> VerificationError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature => VerificationError::InvalidSignature,
        ErrorKind::ExpiredSignature => VerificationError::Expired,
        ErrorKind::InvalidAudience => VerificationError::AudienceMismatch,
        ErrorKind::InvalidIssuer => VerificationError::IssuerMismatch,
        ErrorKind::InvalidAlgorithm => {
            VerificationError::UnsupportedAlgorithm(err.to_string())
        }
        _ => VerificationError::Malformed(err.to_string()),
    }
}
