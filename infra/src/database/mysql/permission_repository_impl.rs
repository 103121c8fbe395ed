//! MySQL implementation of the PermissionRepository trait.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row};

use scribe_core::domain::entities::permission::Capability;
use scribe_core::domain::entities::user::UserId;
use scribe_core::errors::DomainError;
use scribe_core::repositories::PermissionRepository;

use super::db_error;

pub struct MySqlPermissionRepository {
    pool: MySqlPool,
}

impl MySqlPermissionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionRepository for MySqlPermissionRepository {
    async fn capabilities_for(&self, user_id: UserId) -> Result<Vec<Capability>, DomainError> {
        let rows = sqlx::query(
            "SELECT capability FROM user_capabilities WHERE user_id = ? ORDER BY capability",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load capabilities"))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("capability")
                    .map(Capability::new)
                    .map_err(db_error("Failed to get capability"))
            })
            .collect()
    }

    async fn has_capability(&self, user_id: UserId, capability: &Capability) -> Result<bool, DomainError> {
        let row = sqlx::query(
            "SELECT 1 FROM user_capabilities WHERE user_id = ? AND capability = ? LIMIT 1",
        )
        .bind(user_id)
        .bind(capability.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to check capability"))?;

        Ok(row.is_some())
    }

    async fn grant(&self, user_id: UserId, capability: Capability) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_capabilities (user_id, capability, granted_at)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE capability = capability
            "#,
        )
        .bind(user_id)
        .bind(capability.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to grant capability"))?;

        Ok(())
    }
}
