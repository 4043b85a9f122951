use crate::auth::Claims;

/// Allow iff every required scope is present in the token's granted scopes.
///
/// Set semantics: order-independent, duplicates idempotent. An empty
/// requirement always allows.
pub fn authorize(claims: &Claims, required: &[&str]) -> bool {
    let granted = claims.scopes();
    required.iter().all(|scope| granted.contains(*scope))
}
