//! Mock implementations of RevocationRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::entities::token::{RevocationOutcome, RevokedToken};
use crate::errors::DomainError;

use super::trait_::RevocationRepository;

/// In-memory revocation log that counts calls
pub struct MockRevocationRepository {
    records: Arc<RwLock<HashMap<String, RevokedToken>>>,
    lookups: AtomicUsize,
    writes: AtomicUsize,
}

impl MockRevocationRepository {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            lookups: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn get(&self, token: &str) -> Option<RevokedToken> {
        self.records.read().await.get(token).cloned()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for MockRevocationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationRepository for MockRevocationRepository {
    async fn exists(&self, token: &str) -> Result<bool, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.read().await.contains_key(token))
    }

    async fn insert(&self, record: RevokedToken) -> Result<RevocationOutcome, DomainError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.write().await;
        if records.contains_key(&record.token) {
            return Ok(RevocationOutcome::AlreadyRevoked);
        }
        records.insert(record.token.clone(), record);
        Ok(RevocationOutcome::Inserted)
    }

    async fn prune_expired(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| !r.is_prunable(cutoff));
        Ok(before - records.len())
    }
}

/// Store that rejects every call
#[derive(Default)]
pub struct FailingRevocationRepository;

#[async_trait]
impl RevocationRepository for FailingRevocationRepository {
    async fn exists(&self, _token: &str) -> Result<bool, DomainError> {
        Err(DomainError::Internal { message: "connection refused".to_string() })
    }

    async fn insert(&self, _record: RevokedToken) -> Result<RevocationOutcome, DomainError> {
        Err(DomainError::Internal { message: "connection refused".to_string() })
    }

    async fn prune_expired(&self, _cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        Err(DomainError::Internal { message: "connection refused".to_string() })
    }
}

/// Store whose calls never complete in reasonable time
#[derive(Default)]
pub struct StallingRevocationRepository;

impl StallingRevocationRepository {
    async fn stall() {
        tokio::time::sleep(Duration::from_secs(3600)).await;
    }
}

#[async_trait]
impl RevocationRepository for StallingRevocationRepository {
    async fn exists(&self, _token: &str) -> Result<bool, DomainError> {
        Self::stall().await;
        Ok(false)
    }

    async fn insert(&self, _record: RevokedToken) -> Result<RevocationOutcome, DomainError> {
        Self::stall().await;
        Ok(RevocationOutcome::Inserted)
    }

    async fn prune_expired(&self, _cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        Self::stall().await;
        Ok(0)
    }
}
