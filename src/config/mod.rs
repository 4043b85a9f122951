use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration, built once at startup and passed around via state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub app_origin: String,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// External identity provider settings used for bearer token verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Expected `aud` claim.
    pub audience: String,
    /// Expected `iss` claim. The JWKS document is fetched from
    /// `<issuer>/.well-known/jwks.json`.
    pub issuer: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        Self {
            environment,
            port: env_parsed("PORT", 8000),
            app_origin: env_or("APP_ORIGIN", "http://localhost:3000"),
            database: DatabaseConfig {
                user: env_or("PGUSER", "forthrightapiuser"),
                password: env_or("PGPASSWORD", "testing123"),
                host: env_or("PGHOST", "localhost"),
                port: env_parsed("PGPORT", 5432),
                database: env_or("PGDATABASE", "forthrightapi"),
                max_connections: env_parsed("DATABASE_MAX_CONNECTIONS", 10),
                acquire_timeout_secs: env_parsed("DATABASE_ACQUIRE_TIMEOUT_SECS", 30),
            },
            auth: AuthConfig {
                audience: env_or("AUTH0_AUDIENCE", ""),
                issuer: env_or("AUTH0_ISSUER", ""),
            },
        }
    }
}

impl AuthConfig {
    /// JWKS endpoint derived from the issuer, trailing-slash tolerant.
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer.trim_end_matches('/'))
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
