use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::api::auth::AdminUser;
use crate::api::error::ApiError;
use crate::db::{PurchaseRequest, User, UserResponse};
use crate::AppState;

/// All registered users, minus credential material.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY created_at")
        .fetch_all(&state.db)
        .await?;

    let responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(responses))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_books: i64,
    pub total_users: i64,
}

/// Store-wide counts for the admin dashboard.
pub async fn summary(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<SummaryResponse>, ApiError> {
    let (total_books,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
        .fetch_one(&state.db)
        .await?;
    let (total_users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await?;

    Ok(Json(SummaryResponse {
        total_books,
        total_users,
    }))
}

/// All purchase requests, newest first.
pub async fn list_purchase_requests(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<Json<Vec<PurchaseRequest>>, ApiError> {
    let requests: Vec<PurchaseRequest> =
        sqlx::query_as("SELECT * FROM purchase_requests ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(requests))
}
