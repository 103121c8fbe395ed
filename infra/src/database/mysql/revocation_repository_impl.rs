//! MySQL implementation of the RevocationRepository trait.
//!
//! Rows are keyed by the SHA-256 digest of the token, so bearer credentials
//! are never stored at rest. The primary key on the digest makes concurrent
//! revocations of the same token collapse into one row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::MySqlPool;
use tracing::debug;

use scribe_core::domain::entities::token::{RevocationOutcome, RevokedToken};
use scribe_core::errors::DomainError;
use scribe_core::repositories::RevocationRepository;

use super::{db_error, is_unique_violation};

/// MySQL implementation of RevocationRepository
pub struct MySqlRevocationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRevocationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Hexadecimal SHA-256 digest of the exact token string
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[async_trait]
impl RevocationRepository for MySqlRevocationRepository {
    async fn exists(&self, token: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT 1 FROM revoked_tokens WHERE token_hash = ? LIMIT 1")
            .bind(Self::hash_token(token))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to check revocation"))?;

        Ok(row.is_some())
    }

    async fn insert(&self, record: RevokedToken) -> Result<RevocationOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO revoked_tokens (token_hash, revoked_at, expires_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(Self::hash_token(&record.token))
        .bind(record.revoked_at)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(RevocationOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => {
                debug!("Revocation row already present");
                Ok(RevocationOutcome::AlreadyRevoked)
            }
            Err(e) => Err(db_error("Failed to record revocation")(e)),
        }
    }

    async fn prune_expired(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to prune revocations"))?;

        Ok(result.rows_affected() as usize)
    }
}
