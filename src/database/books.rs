use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use thiserror::Error;

/// A row in the `books` table:
/// `books(id bigserial primary key, author text not null, title text not null)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub author: String,
    pub title: String,
}

/// Generic storage failure carrying the underlying diagnostic.
///
/// Connectivity problems and constraint violations are deliberately not
/// distinguished; callers treat any storage error the same way.
#[derive(Debug, Error)]
#[error("storage failure: {0}")]
pub struct StorageError(String);

impl StorageError {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        StorageError(diagnostic.into())
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError(err.to_string())
    }
}

/// Data access layer for the `books` table. Every operation runs exactly one
/// parameterized statement; a missing row is `None`, never an error.
#[derive(Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All rows in storage-native order.
    pub async fn list(&self) -> Result<Vec<Book>, StorageError> {
        let books = sqlx::query_as::<_, Book>("SELECT id, author, title FROM books")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Book>, StorageError> {
        let book = sqlx::query_as::<_, Book>("SELECT id, author, title FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    /// Insert a new row; the id is generated by storage and returned.
    pub async fn create(&self, author: &str, title: &str) -> Result<Book, StorageError> {
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (author, title) VALUES ($1, $2) RETURNING id, author, title",
        )
        .bind(author)
        .bind(title)
        .fetch_one(&self.pool)
        .await?;
        Ok(book)
    }

    /// Overwrite author and title for a row. `None` when no row matched.
    pub async fn update(
        &self,
        id: i64,
        author: &str,
        title: &str,
    ) -> Result<Option<Book>, StorageError> {
        let book = sqlx::query_as::<_, Book>(
            "UPDATE books SET author = $1, title = $2 WHERE id = $3 RETURNING id, author, title",
        )
        .bind(author)
        .bind(title)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    /// Delete a row, returning its prior values. `None` when no row matched.
    pub async fn delete(&self, id: i64) -> Result<Option<Book>, StorageError> {
        let book = sqlx::query_as::<_, Book>(
            "DELETE FROM books WHERE id = $1 RETURNING id, author, title",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }
}
