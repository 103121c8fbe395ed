use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

use scribe_core::domain::entities::token::{RevocationOutcome, RevokedToken};
use scribe_core::errors::DomainError;
use scribe_core::repositories::RevocationRepository;

/// Revocation log keyed by the raw token string
#[derive(Default)]
pub struct InMemoryRevocationRepository {
    records: RwLock<HashMap<String, RevokedToken>>,
}

impl InMemoryRevocationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RevocationRepository for InMemoryRevocationRepository {
    async fn exists(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.records.read().await.contains_key(token))
    }

    async fn insert(&self, record: RevokedToken) -> Result<RevocationOutcome, DomainError> {
        match self.records.write().await.entry(record.token.clone()) {
            Entry::Occupied(_) => Ok(RevocationOutcome::AlreadyRevoked),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(RevocationOutcome::Inserted)
            }
        }
    }

    async fn prune_expired(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| !record.is_prunable(cutoff));
        Ok(before - records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        let repo = InMemoryRevocationRepository::new();
        let now = Utc::now();
        let record = RevokedToken::new("tok", now, now + Duration::hours(1));

        assert_eq!(repo.insert(record.clone()).await.unwrap(), RevocationOutcome::Inserted);
        assert_eq!(repo.insert(record).await.unwrap(), RevocationOutcome::AlreadyRevoked);
        assert_eq!(repo.len().await, 1);
        assert!(repo.exists("tok").await.unwrap());
        assert!(!repo.exists("tok ").await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_leave_one_record() {
        let repo = Arc::new(InMemoryRevocationRepository::new());
        let now = Utc::now();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                let record = RevokedToken::new("shared", now, now + Duration::hours(1));
                tokio::spawn(async move { repo.insert(record).await })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == RevocationOutcome::Inserted {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_prune_expired() {
        let repo = InMemoryRevocationRepository::new();
        let now = Utc::now();
        repo.insert(RevokedToken::new("old", now - Duration::days(2), now - Duration::days(1)))
            .await
            .unwrap();
        repo.insert(RevokedToken::new("new", now, now + Duration::hours(1)))
            .await
            .unwrap();

        assert_eq!(repo.prune_expired(now).await.unwrap(), 1);
        assert!(!repo.exists("old").await.unwrap());
        assert!(repo.exists("new").await.unwrap());
    }
}
