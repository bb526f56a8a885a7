//! Books repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::book::{Book, NewBook},
};

const BOOK_COLUMNS: &str =
    "id, title, author, description, isbn, publication_year, created_at, updated_at";

/// Storage contract for books. Each operation is atomic with respect to
/// a single record; the unique index on `isbn` backs the cross-record
/// uniqueness guarantee.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a new book, assigning its id and `created_at`
    async fn insert(&self, book: &NewBook) -> AppResult<Book>;

    /// Fetch a book by id, or absent
    async fn find(&self, id: i32) -> AppResult<Option<Book>>;

    /// All books, newest first
    async fn list(&self) -> AppResult<Vec<Book>>;

    /// Case-insensitive substring match on title, author, description
    /// or ISBN, newest first
    async fn search(&self, term: &str) -> AppResult<Vec<Book>>;

    /// Whether another book (excluding `exclude_id`) carries this ISBN
    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool>;

    /// Persist the given state of a book and stamp `updated_at`.
    /// Returns absent when the row vanished between fetch and write.
    async fn update(&self, book: &Book) -> AppResult<Option<Book>>;

    /// Hard-delete a book; reports whether a row existed
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so a search term matches literally
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, description, isbn, publication_year, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BOOK_COLUMNS}
            "#,
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(&book.isbn)
        .bind(book.publication_year)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY created_at DESC, id DESC",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn search(&self, term: &str) -> AppResult<Vec<Book>> {
        let pattern = format!("%{}%", escape_like(term));

        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books
            WHERE title ILIKE $1
               OR author ILIKE $1
               OR description ILIKE $1
               OR isbn ILIKE $1
            ORDER BY created_at DESC, id DESC
            "#,
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM books WHERE isbn = $1 AND ($2::int4 IS NULL OR id <> $2))",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, book: &Book) -> AppResult<Option<Book>> {
        let updated = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, author = $2, description = $3, isbn = $4,
                publication_year = $5, updated_at = $6
            WHERE id = $7
            RETURNING {BOOK_COLUMNS}
            "#,
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(&book.isbn)
        .bind(book.publication_year)
        .bind(Utc::now())
        .bind(book.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100% rust"), "100\\% rust");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
