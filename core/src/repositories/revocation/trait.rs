//! Revocation repository trait for the durable log of logged-out tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::{RevocationOutcome, RevokedToken};
use crate::errors::DomainError;

/// Repository trait for revocation records
///
/// Records are keyed by the exact token string. Implementations must be safe
/// under concurrent use: two racing inserts of the same token leave exactly
/// one record and neither caller sees an error.
#[async_trait]
pub trait RevocationRepository: Send + Sync {
    /// Check whether a revocation record exists for `token`
    ///
    /// # Returns
    /// * `Ok(true)` - Token has been revoked
    /// * `Ok(false)` - No record exists
    /// * `Err(DomainError)` - The store could not answer
    async fn exists(&self, token: &str) -> Result<bool, DomainError>;

    /// Record a revocation
    ///
    /// # Returns
    /// * `Ok(RevocationOutcome::Inserted)` - A new record was written
    /// * `Ok(RevocationOutcome::AlreadyRevoked)` - A record already existed
    /// * `Err(DomainError)` - Write failed
    async fn insert(&self, record: RevokedToken) -> Result<RevocationOutcome, DomainError>;

    /// Delete records whose token expired before `cutoff`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted
    async fn prune_expired(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError>;
}
