//! Book (catalog entry) model and request types.
//!
//! Wire shapes are camelCase JSON. Sparse updates use a tagged-option
//! encoding: a field absent from the request body leaves the stored value
//! unchanged, an explicit `null` clears it, and a value overwrites it.
//! On the Rust side this is `Option<Option<T>>` via serde_with's
//! `double_option`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A catalog entry as stored and as returned over the API.
///
/// `updated_at` stays null until the first modification. `description`
/// is never null; it defaults to the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub description: String,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A book ready for insertion, after request validation and ISBN
/// normalization. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub isbn: Option<String>,
    pub publication_year: Option<i32>,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 150, message = "Author must be 1-150 characters"))]
    pub author: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: String,
    #[validate(length(max = 20, message = "ISBN must be at most 20 characters"))]
    pub isbn: Option<String>,
    #[validate(range(min = 1000, max = 2100, message = "Publication year must be 1000-2100"))]
    pub publication_year: Option<i32>,
}

impl From<CreateBook> for NewBook {
    fn from(input: CreateBook) -> Self {
        Self {
            title: input.title,
            author: input.author,
            description: input.description,
            isbn: normalize_isbn(input.isbn),
            publication_year: input.publication_year,
        }
    }
}

/// Sparse update request.
///
/// `title` and `author` are required fields of a book and cannot be
/// cleared, only replaced. The remaining fields accept an explicit
/// `null` to clear: description resets to the empty string, ISBN and
/// publication year to absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 150, message = "Author must be 1-150 characters"))]
    pub author: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[validate(length(max = 20, message = "ISBN must be at most 20 characters"))]
    pub isbn: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    #[validate(range(min = 1000, max = 2100, message = "Publication year must be 1000-2100"))]
    pub publication_year: Option<Option<i32>>,
}

impl UpdateBook {
    /// The ISBN the book would carry after this update, if the request
    /// touches the ISBN at all. Blank strings normalize to a clear.
    pub fn isbn_change(&self) -> Option<Option<String>> {
        self.isbn
            .as_ref()
            .map(|change| normalize_isbn(change.clone()))
    }

    /// Merge this sparse update into a stored book. Absent fields are
    /// left untouched; `updated_at` is the store's responsibility.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(ref title) = self.title {
            book.title = title.clone();
        }
        if let Some(ref author) = self.author {
            book.author = author.clone();
        }
        match self.description {
            Some(Some(ref description)) => book.description = description.clone(),
            Some(None) => book.description.clear(),
            None => {}
        }
        if let Some(isbn) = self.isbn_change() {
            book.isbn = isbn;
        }
        match self.publication_year {
            Some(year) => book.publication_year = year,
            None => {}
        }
    }
}

/// Query parameters for listing/searching books
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Substring matched case-insensitively against title, author,
    /// description and ISBN. Blank or absent lists everything.
    pub search: Option<String>,
}

/// Normalize an ISBN field: blank or whitespace-only collapses to
/// absent, so it never participates in the unique index.
fn normalize_isbn(isbn: Option<String>) -> Option<String> {
    isbn.filter(|s| !s.trim().is_empty())
}
