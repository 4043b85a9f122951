use axum::{response::Json, Extension};
use serde_json::{json, Value};

use crate::auth::{authorize, Claims};
use crate::error::ApiError;

/// Scopes a caller must hold for the scope-gated sample endpoint.
const SCOPED_ENDPOINT_SCOPES: &[&str] = &["read:messages"];

/// GET /access/public
pub async fn public_endpoint() -> Json<Value> {
    Json(json!({
        "message": "Hello from a public endpoint! You don't need to be authenticated to see this."
    }))
}

/// GET /access/protected - requires a verified bearer token.
pub async fn protected_endpoint(Extension(claims): Extension<Claims>) -> Json<Value> {
    tracing::debug!("protected endpoint accessed by {}", claims.sub);

    Json(json!({
        "message": "Hello from a protected endpoint! You need to be authenticated to see this."
    }))
}

/// GET /access/protected/scoped - requires a verified token granting read:messages.
pub async fn protected_scoped(
    Extension(claims): Extension<Claims>,
) -> Result<Json<Value>, ApiError> {
    if !authorize(&claims, SCOPED_ENDPOINT_SCOPES) {
        return Err(ApiError::forbidden("Insufficient scope"));
    }

    Ok(Json(json!({
        "message": "Hello from a scoped endpoint! You need the read:messages scope to see this."
    })))
}
