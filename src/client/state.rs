//! Local catalog state for frontend consumers.
//!
//! Holds the full book list plus a search term; the filtered view is a
//! pure function of both and is recomputed on demand. Mutations are
//! reconciled from server-returned entities rather than re-fetching.

use crate::models::book::Book;

#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    books: Vec<Book>,
    search_term: String,
}

/// Case-insensitive substring match over the searchable fields
fn matches(book: &Book, term: &str) -> bool {
    book.title.to_lowercase().contains(term)
        || book.author.to_lowercase().contains(term)
        || book.description.to_lowercase().contains(term)
        || book
            .isbn
            .as_ref()
            .is_some_and(|isbn| isbn.to_lowercase().contains(term))
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the full list, e.g. after an initial fetch
    pub fn set_books(&mut self, books: Vec<Book>) {
        self.books = books;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// The derived view: all books when the term is blank, otherwise
    /// those matching it case-insensitively on title, author,
    /// description or ISBN.
    pub fn filtered(&self) -> Vec<&Book> {
        let term = self.search_term.trim().to_lowercase();
        if term.is_empty() {
            return self.books.iter().collect();
        }
        self.books.iter().filter(|b| matches(b, &term)).collect()
    }

    /// Reconcile a successful create: newest first, so prepend
    pub fn apply_created(&mut self, book: Book) {
        self.books.insert(0, book);
    }

    /// Reconcile a successful update: replace by id
    pub fn apply_updated(&mut self, book: Book) {
        if let Some(existing) = self.books.iter_mut().find(|b| b.id == book.id) {
            *existing = book;
        }
    }

    /// Reconcile a successful delete: remove by id
    pub fn apply_deleted(&mut self, id: i32) {
        self.books.retain(|b| b.id != id);
    }
}
