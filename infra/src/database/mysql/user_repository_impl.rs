//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use scribe_core::domain::entities::user::{NewUser, PasswordHash, User, UserId};
use scribe_core::errors::{AuthError, DomainError};
use scribe_core::repositories::UserRepository;

use super::{db_error, is_unique_violation};

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, middle_name, bio, image, \
                            active, password_hash, created_at, updated_at";

/// MySQL implementation of UserRepository
///
/// Username and email uniqueness is enforced by unique keys; the case-insensitive
/// column collation makes lookups and clashes case-insensitive.
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let get_err = |column: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", column, e),
        };

        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| get_err("password_hash", e))?;

        Ok(User {
            id: row.try_get("id").map_err(|e| get_err("id", e))?,
            username: row.try_get("username").map_err(|e| get_err("username", e))?,
            email: row.try_get("email").map_err(|e| get_err("email", e))?,
            first_name: row.try_get("first_name").map_err(|e| get_err("first_name", e))?,
            last_name: row.try_get("last_name").map_err(|e| get_err("last_name", e))?,
            middle_name: row.try_get("middle_name").map_err(|e| get_err("middle_name", e))?,
            bio: row.try_get("bio").map_err(|e| get_err("bio", e))?,
            image: row.try_get("image").map_err(|e| get_err("image", e))?,
            active: row.try_get("active").map_err(|e| get_err("active", e))?,
            password_hash: PasswordHash::from_stored(password_hash),
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| get_err("created_at", e))?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| get_err("updated_at", e))?,
        })
    }

    /// Map a unique key violation to the field it guards
    fn conflict(err: sqlx::Error, context: &str) -> DomainError {
        if is_unique_violation(&err) {
            let field = match err.as_database_error() {
                Some(db) if db.message().contains("username") => "username",
                _ => "email",
            };
            return AuthError::UserAlreadyExists { field: field.to_string() }.into();
        }
        db_error(context)(err)
    }

    async fn find_one(&self, clause: &str, value: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = ? LIMIT 1", USER_COLUMNS, clause);
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = ? LIMIT 1", USER_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email).await
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                username, email, first_name, last_name, middle_name,
                active, password_hash, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, TRUE, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.middle_name)
        .bind(user.password_hash.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::conflict(e, "Failed to create user"))?;

        let id = result.last_insert_id() as UserId;
        self.find_by_id(id).await?.ok_or_else(|| DomainError::Internal {
            message: format!("User {} vanished after insert", id),
        })
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, first_name = ?, last_name = ?, middle_name = ?,
                bio = ?, image = ?, active = ?, password_hash = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.middle_name)
        .bind(&user.bio)
        .bind(&user.image)
        .bind(user.active)
        .bind(user.password_hash.as_str())
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::conflict(e, "Failed to update user"))?;

        // MySQL reports zero affected rows for a no-op update, so re-read
        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<User>, DomainError> {
        let query = format!("SELECT {} FROM users ORDER BY id LIMIT ? OFFSET ?", USER_COLUMNS);
        let rows = sqlx::query(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list users"))?;

        rows.iter().map(Self::row_to_user).collect()
    }
}
