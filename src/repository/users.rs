//! Users repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::user::{NewUser, User},
};

const USER_COLUMNS: &str = "id, email, password_hash, full_name, created_at, is_active";

/// Storage contract for user accounts. The unique index on `email`
/// backs the registration uniqueness guarantee.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, assigning its id and `created_at`
    async fn insert(&self, user: &NewUser) -> AppResult<User>;

    /// Fetch a user by id, or absent
    async fn find(&self, id: i32) -> AppResult<Option<User>>;

    /// Fetch a user by email, or absent
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UsersRepository {
    async fn insert(&self, user: &NewUser) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, full_name, created_at, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find(&self, id: i32) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
