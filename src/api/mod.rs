mod admin;
pub mod auth;
mod books;
pub mod error;
pub mod tokens;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes: signup/signin/refresh/logout are public, the rest carry
    // their own extractor-based auth
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::profile))
        .route("/profile", put(auth::update_profile))
        .route("/check", post(auth::check_token));

    let book_routes = Router::new()
        .route("/books", get(books::list_books))
        .route("/books/:id", delete(books::delete_book))
        .route("/books/:id/pages", get(books::book_pages))
        .route("/search", get(books::search_books))
        .route("/user-books", get(books::user_books))
        .route("/purchase-requests", post(books::create_purchase_request))
        // Keep last: matches any /<category>/<id> the statics above don't
        .route("/:category/:id", get(books::get_book));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/summary", get(admin::summary))
        .route("/purchase-requests", get(admin::list_purchase_requests));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api", book_routes)
        .layer(TraceLayer::new_for_http());

    // Credentialed CORS for the SPA dev server; same-origin deploys skip this
    if let Some(origin) = &state.config.server.cors_origin {
        match HeaderValue::from_str(origin) {
            Ok(origin) => {
                let cors = CorsLayer::new()
                    .allow_origin(origin)
                    .allow_credentials(true)
                    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                    .allow_headers([header::CONTENT_TYPE]);
                router = router.layer(cors);
            }
            Err(_) => {
                tracing::warn!("Invalid cors_origin value, CORS disabled: {}", origin);
            }
        }
    }

    router.with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
