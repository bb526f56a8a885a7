//! Repository layer for database operations.
//!
//! Services depend on the `BookStore`/`UserStore` traits; the Postgres
//! repositories here are their only production implementors.

pub mod books;
pub mod users;

pub use books::{BookStore, BooksRepository};
pub use users::{UserStore, UsersRepository};

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}
