use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;

use crate::config::DatabaseConfig;

pub mod books;

pub use books::{Book, BookRepository, StorageError};

/// Build the shared connection pool.
///
/// Connections are established lazily, so the server starts even when the
/// database is unreachable; requests fail with a storage error until it
/// comes back.
pub fn connect(config: &DatabaseConfig) -> PgPool {
    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_lazy_with(options)
}
