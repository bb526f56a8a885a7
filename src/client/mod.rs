//! Typed API client for the Libris REST interface.
//!
//! `ApiClient` owns an explicit [`AuthContext`] instead of reading a
//! token from ambient storage: callers authenticate through the client
//! and every protected call consults the context. A 401 from the server
//! clears the context back to `Anonymous`. Mutations return the
//! server's entity so callers can reconcile a [`state::CatalogState`]
//! without re-fetching the full list; a failed call returns an error
//! and never partially applies anything.

pub mod state;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    api::auth::{AuthResponse, LoginRequest, RegisterRequest, UserInfo},
    models::book::{Book, CreateBook, UpdateBook},
};

/// Client-side failure taxonomy. The caller never retries 4xx
/// automatically; it surfaces the message and leaves local state intact.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("authentication required")]
    Unauthorized,

    #[error("{message}")]
    Api { status: StatusCode, message: String },
}

/// Client-side authentication lifecycle:
/// Anonymous -> Authenticated -> Expired (or back to Anonymous on
/// logout / server-side 401).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthContext {
    #[default]
    Anonymous,
    Authenticated {
        token: String,
        expires_at: DateTime<Utc>,
    },
    Expired,
}

impl AuthContext {
    /// Enter the authenticated state with a fresh token
    pub fn authenticate(&mut self, token: String, expires_at: DateTime<Utc>) {
        *self = AuthContext::Authenticated { token, expires_at };
    }

    /// Drop credentials, returning to `Anonymous`
    pub fn clear(&mut self) {
        *self = AuthContext::Anonymous;
    }

    /// The bearer token, if still valid. A past-expiry token moves the
    /// context to `Expired` and yields nothing.
    pub fn token(&mut self) -> Option<&str> {
        if let AuthContext::Authenticated { expires_at, .. } = self {
            if *expires_at <= Utc::now() {
                *self = AuthContext::Expired;
            }
        }
        match self {
            AuthContext::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }
}

/// Shape of the server's JSON error body
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth: AuthContext,
}

impl ApiClient {
    /// Create a client against a server base URL, e.g.
    /// `http://localhost:8080/api/v1`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            auth: AuthContext::Anonymous,
        }
    }

    /// Current authentication state
    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// Forget credentials
    pub fn logout(&mut self) {
        self.auth.clear();
    }

    /// Register a new account and enter the authenticated state
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<UserInfo, ClientError> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
        };
        let response = self
            .http
            .post(format!("{}/auth/register", self.base_url))
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = self.check(response).await?;
        self.auth.authenticate(auth.token, auth.expires_at);
        Ok(auth.user)
    }

    /// Log in and enter the authenticated state
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserInfo, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&body)
            .send()
            .await?;
        let auth: AuthResponse = self.check(response).await?;
        self.auth.authenticate(auth.token, auth.expires_at);
        Ok(auth.user)
    }

    /// The authenticated user's profile
    pub async fn me(&mut self) -> Result<UserInfo, ClientError> {
        let token = self.bearer()?;
        let response = self
            .http
            .get(format!("{}/auth/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        self.check(response).await
    }

    /// List books, optionally filtered by a search term
    pub async fn list_books(&mut self, search: Option<&str>) -> Result<Vec<Book>, ClientError> {
        let mut request = self.http.get(format!("{}/books", self.base_url));
        if let Some(term) = search {
            request = request.query(&[("search", term)]);
        }
        let response = request.send().await?;
        self.check(response).await
    }

    /// Fetch a single book by id
    pub async fn get_book(&mut self, id: i32) -> Result<Book, ClientError> {
        let response = self
            .http
            .get(format!("{}/books/{}", self.base_url, id))
            .send()
            .await?;
        self.check(response).await
    }

    /// Create a book; feed the result to `CatalogState::apply_created`
    pub async fn create_book(&mut self, input: &CreateBook) -> Result<Book, ClientError> {
        let token = self.bearer()?;
        let response = self
            .http
            .post(format!("{}/books", self.base_url))
            .bearer_auth(token)
            .json(input)
            .send()
            .await?;
        self.check(response).await
    }

    /// Sparse-update a book; feed the result to
    /// `CatalogState::apply_updated`
    pub async fn update_book(
        &mut self,
        id: i32,
        input: &UpdateBook,
    ) -> Result<Book, ClientError> {
        let token = self.bearer()?;
        let response = self
            .http
            .put(format!("{}/books/{}", self.base_url, id))
            .bearer_auth(token)
            .json(input)
            .send()
            .await?;
        self.check(response).await
    }

    /// Delete a book; on success call `CatalogState::apply_deleted`
    pub async fn delete_book(&mut self, id: i32) -> Result<(), ClientError> {
        let token = self.bearer()?;
        let response = self
            .http
            .delete(format!("{}/books/{}", self.base_url, id))
            .bearer_auth(token)
            .send()
            .await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(self.error_from(response).await)
    }

    fn bearer(&mut self) -> Result<String, ClientError> {
        self.auth
            .token()
            .map(str::to_string)
            .ok_or(ClientError::Unauthorized)
    }

    async fn check<T: DeserializeOwned>(
        &mut self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        if response.status().is_success() {
            return Ok(response.json().await?);
        }
        Err(self.error_from(response).await)
    }

    /// Map an error response; a 401 invalidates cached credentials
    async fn error_from(&mut self, response: reqwest::Response) -> ClientError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.auth.clear();
            return ClientError::Unauthorized;
        }
        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("request failed with status {}", status));
        ClientError::Api { status, message }
    }
}
