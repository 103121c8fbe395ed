//! Permission repository trait: which capabilities each user holds.

use async_trait::async_trait;

use crate::domain::entities::permission::Capability;
use crate::domain::entities::user::UserId;
use crate::errors::DomainError;

#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// All capabilities granted to `user_id`
    async fn capabilities_for(&self, user_id: UserId) -> Result<Vec<Capability>, DomainError>;

    /// Grant a capability; granting twice is a no-op
    async fn grant(&self, user_id: UserId, capability: Capability) -> Result<(), DomainError>;

    async fn has_capability(
        &self,
        user_id: UserId,
        capability: &Capability,
    ) -> Result<bool, DomainError> {
        Ok(self.capabilities_for(user_id).await?.contains(capability))
    }
}
