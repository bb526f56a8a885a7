//! User model and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account. The password hash never leaves the auth
/// boundary; API-facing user data goes through `api::auth::UserInfo`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A user ready for insertion, password already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
}

/// JWT claims carried by bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User email
    pub sub: String,
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: "reader@example.org".to_string(),
            user_id: 42,
            iat: now,
            exp: now + 3600,
        };
        let token = claims.create_token("test-secret").unwrap();
        let parsed = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(parsed.sub, "reader@example.org");
        assert_eq!(parsed.user_id, 42);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: "reader@example.org".to_string(),
            user_id: 42,
            iat: now,
            exp: now + 3600,
        };
        let token = claims.create_token("test-secret").unwrap();
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_token_rejects_expired() {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: "reader@example.org".to_string(),
            user_id: 42,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = claims.create_token("test-secret").unwrap();
        assert!(UserClaims::from_token(&token, "test-secret").is_err());
    }
}
