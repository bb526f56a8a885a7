//! Libris Library Catalog Server
//!
//! A Rust REST API server for a library book catalog: book CRUD with
//! ISBN uniqueness, substring search, and JWT email/password
//! authentication, plus a typed API client for frontend consumers.

use std::sync::Arc;

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
