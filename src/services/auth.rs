//! Authentication service: registration, login, token issuance

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, TimeZone, Utc};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{NewUser, User, UserClaims},
    repository::UserStore,
};

/// Outcome of a successful registration or login
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self { store, config }
    }

    /// Register a new account. Email must be unique across all users.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> AppResult<AuthenticatedSession> {
        if self.store.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let user = NewUser {
            email: email.to_string(),
            password_hash: self.hash_password(password)?,
            full_name: full_name.to_string(),
        };

        let created = self.store.insert(&user).await?;
        tracing::info!("User registered: {}", created.email);
        self.create_session(created)
    }

    /// Authenticate by email and password and issue a bearer token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthenticatedSession> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !user.is_active {
            return Err(AppError::Authentication("Account is disabled".to_string()));
        }

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        self.create_session(user)
    }

    /// Get a user by id (for the /auth/me endpoint)
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Create a JWT session for a user
    fn create_session(&self, user: User) -> AppResult<AuthenticatedSession> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            exp,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        let expires_at = Utc
            .timestamp_opt(exp, 0)
            .single()
            .ok_or_else(|| AppError::Internal("Token expiry out of range".to_string()))?;

        Ok(AuthenticatedSession {
            token,
            expires_at,
            user,
        })
    }

    /// Verify a user's password against the stored Argon2 hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
