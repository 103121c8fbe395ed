//! Mock implementation of PermissionRepository for testing

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::entities::permission::Capability;
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

use super::trait_::PermissionRepository;

#[derive(Default)]
pub struct MockPermissionRepository {
    grants: RwLock<HashMap<UserId, BTreeSet<Capability>>>,
    unavailable: AtomicBool,
}

impl MockPermissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Internal { message: "permission store down".to_string() });
        }
        Ok(())
    }
}

#[async_trait]
impl PermissionRepository for MockPermissionRepository {
    async fn capabilities_for(&self, user_id: UserId) -> Result<Vec<Capability>, DomainError> {
        self.check()?;
        let grants = self.grants.read().await;
        Ok(grants
            .get(&user_id)
            .map(|caps| caps.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn grant(&self, user_id: UserId, capability: Capability) -> Result<(), DomainError> {
        self.check()?;
        self.grants.write().await.entry(user_id).or_default().insert(capability);
        Ok(())
    }
}
