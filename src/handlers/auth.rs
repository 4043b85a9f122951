use axum::Json;

// Placeholder endpoints: account management lives entirely with the external
// identity provider, these only acknowledge the calls.

/// POST /auth/signup
pub async fn signup() -> Json<&'static str> {
    Json("Success")
}

/// POST /auth/login
pub async fn login() -> Json<&'static str> {
    Json("Success")
}
