//! Book text provisioning for the reader endpoint.
//!
//! There is no real book content in the store; the reader serves pages from a
//! [`TextProvider`]. The default provider synthesizes placeholder text, but
//! the seam exists so real content storage can slot in behind the same
//! endpoint.

use crate::db::Book;

/// Fixed page size, in characters.
pub const PAGE_SIZE: usize = 500;

/// Source of the full text of a book.
pub trait TextProvider: Send + Sync {
    fn text(&self, book: &Book) -> String;
}

/// Placeholder provider: a stock phrase repeated enough times to make a
/// plausibly book-sized body of text.
pub struct PlaceholderText {
    phrase: String,
    repeats: usize,
}

impl PlaceholderText {
    pub fn new(phrase: impl Into<String>, repeats: usize) -> Self {
        Self {
            phrase: phrase.into(),
            repeats,
        }
    }
}

impl Default for PlaceholderText {
    fn default() -> Self {
        Self::new("This is the content of the book... ", 10_000)
    }
}

impl TextProvider for PlaceholderText {
    fn text(&self, _book: &Book) -> String {
        self.phrase.repeat(self.repeats)
    }
}

/// Total number of pages for a body of text. Counts characters, not bytes,
/// so multi-byte text never splits mid-character.
pub fn page_count(text: &str) -> usize {
    text.chars().count().div_ceil(PAGE_SIZE)
}

/// One page of text, 1-based. `None` when the page is out of range.
pub fn page(text: &str, page: usize) -> Option<String> {
    if page < 1 || page > page_count(text) {
        return None;
    }
    Some(
        text.chars()
            .skip((page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect(),
    )
}
