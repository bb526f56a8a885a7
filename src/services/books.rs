//! Book lifecycle service.
//!
//! Field-level constraints are enforced at the request-validation
//! boundary before these methods run; this service owns the
//! cross-record rules: ISBN uniqueness and sparse-update merging.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, NewBook, UpdateBook},
    repository::BookStore,
};

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Create a new book. A non-blank ISBN must not collide with any
    /// existing book; on collision nothing is written.
    pub async fn create(&self, input: CreateBook) -> AppResult<Book> {
        let book = NewBook::from(input);

        if let Some(ref isbn) = book.isbn {
            if self.store.isbn_exists(isbn, None).await? {
                return Err(AppError::Conflict(format!(
                    "A book with ISBN '{}' already exists",
                    isbn
                )));
            }
        }

        let created = self.store.insert(&book).await?;
        tracing::info!("Book created: {} by {}", created.title, created.author);
        Ok(created)
    }

    /// List or search books, newest first. A blank search term is
    /// equivalent to listing everything; a non-matching term yields an
    /// empty list, not an error.
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        match query.search.as_deref() {
            Some(term) if !term.trim().is_empty() => self.store.search(term).await,
            _ => self.store.list().await,
        }
    }

    /// Get a book by id
    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Apply a sparse update. Changing the ISBN to a value held by
    /// another book is a conflict; any successful update stamps
    /// `updated_at` regardless of which fields changed.
    pub async fn update(&self, id: i32, input: UpdateBook) -> AppResult<Book> {
        let mut book = self.get(id).await?;

        if let Some(Some(ref new_isbn)) = input.isbn_change() {
            if book.isbn.as_deref() != Some(new_isbn.as_str())
                && self.store.isbn_exists(new_isbn, Some(id)).await?
            {
                return Err(AppError::Conflict(format!(
                    "A book with ISBN '{}' already exists",
                    new_isbn
                )));
            }
        }

        input.apply_to(&mut book);

        let updated = self
            .store
            .update(&book)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        tracing::info!("Book updated: {}", updated.title);
        Ok(updated)
    }

    /// Delete a book. Deleting an absent id is a no-op reported as
    /// `false`, not an application error.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            tracing::info!("Book deleted: id={}", id);
        }
        Ok(deleted)
    }
}
