//! Business logic services

pub mod auth;
pub mod books;

use std::sync::Arc;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub auth: auth::AuthService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            books: books::BooksService::new(Arc::new(repository.books.clone())),
            auth: auth::AuthService::new(Arc::new(repository.users), auth_config),
        }
    }
}
