use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::auth::{AdminUser, AuthUser};
use crate::api::error::ApiError;
use crate::content;
use crate::db::{Book, CreatePurchaseRequest, MessageResponse, PageResponse};
use crate::AppState;

/// List the whole catalog.
pub async fn list_books(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Book>>, ApiError> {
    let books: Vec<Book> = sqlx::query_as("SELECT * FROM books ORDER BY title")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(books))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Case-insensitive substring search over title, author, and description.
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let pattern = format!("%{}%", params.q);
    let books: Vec<Book> = sqlx::query_as(
        r#"
        SELECT * FROM books
        WHERE title LIKE ? OR author LIKE ? OR description LIKE ?
        ORDER BY title
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(books))
}

/// Fetch one book by category and id.
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path((category, id)): Path<(String, String)>,
) -> Result<Json<Book>, ApiError> {
    let book: Option<Book> = sqlx::query_as("SELECT * FROM books WHERE category = ? AND id = ?")
        .bind(&category)
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;

    let book = book.ok_or_else(|| ApiError::not_found("Book not found"))?;
    Ok(Json(book))
}

/// Books belonging to the calling user.
pub async fn user_books(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books: Vec<Book> = sqlx::query_as("SELECT * FROM books WHERE client_id = ? ORDER BY title")
        .bind(&user.id)
        .fetch_all(&state.db)
        .await?;
    Ok(Json(books))
}

/// Remove a book from the catalog (admin only). Pending purchase requests
/// for the book go with it (ON DELETE CASCADE).
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Book not found"));
    }

    tracing::info!(book_id = %id, admin = %user.id, "Book deleted");
    Ok(Json(MessageResponse {
        message: "Book deleted".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
}

/// One page of a book's text, sliced out of the configured text provider.
pub async fn book_pages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<PageResponse>, ApiError> {
    let book: Option<Book> = sqlx::query_as("SELECT * FROM books WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?;
    let book = book.ok_or_else(|| ApiError::not_found("Book not found"))?;

    let page = params.page.unwrap_or(1);
    let text = state.text.text(&book);
    let total_pages = content::page_count(&text);

    let page_text =
        content::page(&text, page).ok_or_else(|| ApiError::bad_request("Invalid page number"))?;

    Ok(Json(PageResponse {
        page,
        total_pages,
        text: page_text,
    }))
}

/// Record a purchase request for a book. The store follows up out of band;
/// nothing is charged here.
pub async fn create_purchase_request(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePurchaseRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let book: Option<(String,)> = sqlx::query_as("SELECT id FROM books WHERE id = ?")
        .bind(&req.book_id)
        .fetch_optional(&state.db)
        .await?;
    if book.is_none() {
        return Err(ApiError::not_found("Book not found"));
    }

    sqlx::query(
        "INSERT INTO purchase_requests (id, book_id, name, email, phone) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(&req.book_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.phone)
    .execute(&state.db)
    .await?;

    tracing::info!(book_id = %req.book_id, "Purchase request recorded");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Purchase request received".to_string(),
        }),
    ))
}
