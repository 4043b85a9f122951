use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::Book;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct BookInput {
    pub author: String,
    pub title: String,
}

/// GET /sample/books
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Book>> {
    let books = state.books.list().await?;
    Ok(ApiResponse::success(books))
}

/// GET /sample/books/:book_id
pub async fn get(State(state): State<AppState>, Path(book_id): Path<String>) -> ApiResult<Book> {
    let book_id = parse_book_id(&book_id)?;

    match state.books.get_by_id(book_id).await? {
        Some(book) => Ok(ApiResponse::success(book)),
        None => Err(ApiError::not_found("Book id not found")),
    }
}

/// POST /sample/books
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<BookInput>,
) -> ApiResult<Book> {
    let book = state.books.create(&input.author, &input.title).await?;
    Ok(ApiResponse::created(book))
}

/// PUT /sample/books/:book_id
pub async fn update(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Json(input): Json<BookInput>,
) -> ApiResult<Book> {
    let book_id = parse_book_id(&book_id)?;

    match state
        .books
        .update(book_id, &input.author, &input.title)
        .await?
    {
        Some(book) => Ok(ApiResponse::success(book)),
        None => Err(ApiError::not_found("No matching book id")),
    }
}

/// DELETE /sample/books/:book_id
pub async fn delete(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> ApiResult<Book> {
    let book_id = parse_book_id(&book_id)?;

    match state.books.delete(book_id).await? {
        Some(book) => Ok(ApiResponse::success(book)),
        None => Err(ApiError::not_found("No matching book id")),
    }
}

/// Non-numeric ids are rejected up front, before any storage call.
fn parse_book_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("Book id must be an integer"))
}
