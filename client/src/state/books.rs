//! Catalog-list state for the shared book library.
//!
//! DESIGN
//! ======
//! Separating list state from per-book detail state avoids accidental
//! coupling between navigation inventory and in-detail editing data.

#[cfg(test)]
#[path = "books_test.rs"]
mod books_test;

use crate::net::types::Book;

/// Shared catalog state backed by REST fetches and change-feed refreshes.
#[derive(Clone, Debug, Default)]
pub struct BooksState {
    pub items: Vec<Book>,
    pub loading: bool,
    pub error: Option<String>,
    /// Set after a successful create so the catalog page can navigate to
    /// the new book's detail view, then cleared.
    pub created_book_id: Option<String>,
}

impl BooksState {
    /// Replace the catalog with a freshly fetched listing.
    pub fn apply_listing(&mut self, items: Vec<Book>) {
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    /// Record a listing failure without discarding the stale catalog.
    pub fn apply_error(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }
}
