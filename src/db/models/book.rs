//! Book catalog and purchase request models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The fixed set of catalog categories.
pub const CATEGORIES: &[&str] = &[
    "Adventure", "Romance", "Thriller", "Memoir", "Travel", "Health", "Poetry", "Cooking",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    /// Set once a purchase has been fulfilled; `None` for catalog stock.
    pub client_id: Option<String>,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover: String,
    pub category: String,
    pub is_paid: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub id: String,
    pub book_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequest {
    pub book_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// One page of book text as served by the reader endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub page: usize,
    pub total_pages: usize,
    pub text: String,
}
