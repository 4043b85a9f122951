// Router assembly is kept separate from serving so tests can drive the app
// in-process.
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{middleware as axum_middleware, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::database::{self, BookRepository};
use crate::handlers::{access, auth, books};
use crate::middleware::jwt_auth_middleware;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub books: BookRepository,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let pool = database::connect(&config.database);
        let verifier = TokenVerifier::new(&config.auth);

        Self {
            config: Arc::new(config),
            books: BookRepository::new(pool),
            verifier: Arc::new(verifier),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .merge(auth_routes())
        .merge(books_routes())
        .merge(access_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
}

fn books_routes() -> Router<AppState> {
    Router::new()
        .route("/sample/books", get(books::list).post(books::create))
        .route(
            "/sample/books/:book_id",
            get(books::get).put(books::update).delete(books::delete),
        )
}

fn access_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/access/protected", get(access::protected_endpoint))
        .route("/access/protected/scoped", get(access::protected_scoped))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            jwt_auth_middleware,
        ))
        .route("/access/public", get(access::public_endpoint))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    match config.app_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(
                "invalid APP_ORIGIN {:?}, falling back to permissive CORS",
                config.app_origin
            );
            CorsLayer::permissive()
        }
    }
}
