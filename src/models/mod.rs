//! Data models for the Libris server

pub mod book;
pub mod user;

pub use book::{Book, BookQuery, CreateBook, NewBook, UpdateBook};
pub use user::{NewUser, User, UserClaims};
