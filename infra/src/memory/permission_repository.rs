use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;

use scribe_core::domain::entities::permission::Capability;
use scribe_core::domain::entities::user::UserId;
use scribe_core::errors::DomainError;
use scribe_core::repositories::PermissionRepository;

#[derive(Default)]
pub struct InMemoryPermissionRepository {
    grants: RwLock<HashMap<UserId, BTreeSet<Capability>>>,
}

impl InMemoryPermissionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PermissionRepository for InMemoryPermissionRepository {
    async fn capabilities_for(&self, user_id: UserId) -> Result<Vec<Capability>, DomainError> {
        let grants = self.grants.read().await;
        Ok(grants
            .get(&user_id)
            .map(|caps| caps.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn grant(&self, user_id: UserId, capability: Capability) -> Result<(), DomainError> {
        self.grants
            .write()
            .await
            .entry(user_id)
            .or_default()
            .insert(capability);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_grant_twice_is_noop() {
        let repo = InMemoryPermissionRepository::new();
        repo.grant(1, Capability::users_list()).await.unwrap();
        repo.grant(1, Capability::users_list()).await.unwrap();

        assert_eq!(repo.capabilities_for(1).await.unwrap(), vec![Capability::users_list()]);
        assert!(repo.has_capability(1, &Capability::users_list()).await.unwrap());
        assert!(!repo.has_capability(2, &Capability::users_list()).await.unwrap());
    }
}
