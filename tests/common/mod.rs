// Shared helpers for the in-process integration tests. The router is driven
// through `tower::ServiceExt::oneshot`, so no server process or live JWKS
// endpoint is needed; token verification runs against a fake fetcher holding
// the checked-in test key.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use forthright_api::app::{app, AppState};
use forthright_api::auth::{Claims, JwksError, JwksFetcher, TokenVerifier};
use forthright_api::config::{AppConfig, AuthConfig, DatabaseConfig, Environment};
use forthright_api::database::{self, BookRepository};

pub const SIGNING_KEY_PEM: &str = include_str!("../keys/jwt_signing_key.pem");
pub const SIGNING_KID: &str = "forthright-test-key";
pub const AUDIENCE: &str = "https://api.forthright.test";
pub const ISSUER: &str = "https://forthright.test.auth0.example/";

const SIGNING_KEY_MODULUS: &str = "wzULny7KH4K-A6zkGGJKoCMfAUwLc9mb0pOf9wqEWo0cj-oYwoODu6uX4pRe72CV2gPVUzumGsjvs0QLuyCF_ds-pefNDNYgowIX_0peoTBuRFeQDnFj84CEZ8087Pjt8srzYvnDrlbATmg3ZzACpk7QPR0Lv3yW96S_vdN6K5mFa9TigduKSK-xRBzKL5DOpcAS6Di25Y_IPwb-iHv1O6w5aZp0P26I405JctAme_cNtvBm7JNDg8w1uJH8BvwcfS4lAOW5MEMLNNZzssJn2xP4dPXDo_GP6Twadc6m0mfsIzfgj7KAalxRvY2E6CbWwGR0bzQv3CUQ0jEiwP5JvQ";

pub struct StaticJwksFetcher {
    jwk_set: JwkSet,
}

#[async_trait]
impl JwksFetcher for StaticJwksFetcher {
    async fn fetch(&self) -> Result<JwkSet, JwksError> {
        Ok(self.jwk_set.clone())
    }
}

fn jwk_set() -> JwkSet {
    serde_json::from_value(json!({
        "keys": [
            {
                "kty": "RSA",
                "use": "sig",
                "alg": "RS256",
                "kid": SIGNING_KID,
                "n": SIGNING_KEY_MODULUS,
                "e": "AQAB",
            }
        ]
    }))
    .expect("test JWKS document")
}

pub fn test_config() -> AppConfig {
    AppConfig {
        environment: Environment::Development,
        port: 0,
        app_origin: "http://localhost:3000".to_string(),
        database: DatabaseConfig {
            user: "forthrightapiuser".to_string(),
            password: "testing123".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            database: "forthrightapi".to_string(),
            max_connections: 2,
            acquire_timeout_secs: 2,
        },
        auth: AuthConfig {
            audience: AUDIENCE.to_string(),
            issuer: ISSUER.to_string(),
        },
    }
}

fn state_with_pool(pool: PgPool) -> AppState {
    let config = test_config();
    let verifier = TokenVerifier::with_fetcher(
        &config.auth,
        Box::new(StaticJwksFetcher { jwk_set: jwk_set() }),
    );

    AppState {
        config: Arc::new(config),
        books: BookRepository::new(pool),
        verifier: Arc::new(verifier),
    }
}

/// App over a lazy pool; fine for every endpoint that never touches storage.
pub fn test_app() -> Router {
    let config = test_config();
    app(state_with_pool(database::connect(&config.database)))
}

/// App over a caller-supplied pool, for tests with a real database behind them.
pub fn test_app_with_pool(pool: PgPool) -> Router {
    app(state_with_pool(pool))
}

/// Mint a valid RS256 token for the test key, optionally carrying scopes.
pub fn mint_token(scope: Option<&str>) -> String {
    let claims = Claims {
        sub: "auth0|integration-user".to_string(),
        aud: AUDIENCE.to_string(),
        iss: ISSUER.to_string(),
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
        scope: scope.map(str::to_string),
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(SIGNING_KID.to_string());
    let key = EncodingKey::from_rsa_pem(SIGNING_KEY_PEM.as_bytes()).expect("test RSA key");
    encode(&header, &claims, &key).expect("token encoding")
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("infallible app")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read");
    serde_json::from_slice(&bytes).expect("JSON body")
}

pub async fn assert_status_and_body(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
