pub mod api;
pub mod config;
pub mod content;
pub mod db;

pub use db::DbPool;

use std::sync::Arc;

use api::tokens::TokenIssuer;
use config::Config;
use content::{PlaceholderText, TextProvider};

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub tokens: TokenIssuer,
    pub text: Arc<dyn TextProvider>,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        let tokens = TokenIssuer::new(&config.auth);
        Self {
            config,
            db,
            tokens,
            text: Arc::new(PlaceholderText::default()),
        }
    }

    /// Swap in a different text source for the reader endpoint.
    pub fn with_text_provider(mut self, text: Arc<dyn TextProvider>) -> Self {
        self.text = text;
        self
    }
}
