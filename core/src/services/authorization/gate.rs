//! Capability checks for authenticated users

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::permission::{Capability, Decision};
use crate::domain::entities::user::UserId;
use crate::errors::{AuthError, DomainResult};
use crate::repositories::PermissionRepository;

/// Decides whether a user holds a capability.
///
/// Any failure to consult the permission store results in `Denied`.
pub struct PermissionGate<P: PermissionRepository> {
    repository: Arc<P>,
}

impl<P: PermissionRepository> PermissionGate<P> {
    pub fn new(repository: Arc<P>) -> Self {
        Self { repository }
    }

    pub async fn authorize(&self, user_id: UserId, capability: &Capability) -> Decision {
        match self.repository.has_capability(user_id, capability).await {
            Ok(true) => Decision::Allowed,
            Ok(false) => {
                debug!(user_id, %capability, "Capability not granted");
                Decision::Denied
            }
            Err(e) => {
                warn!(user_id, %capability, error = %e, "Permission lookup failed, denying");
                Decision::Denied
            }
        }
    }

    /// Like `authorize`, but as a `Result` for `?` in handlers
    pub async fn require(&self, user_id: UserId, capability: &Capability) -> DomainResult<()> {
        match self.authorize(user_id, capability).await {
            Decision::Allowed => Ok(()),
            Decision::Denied => Err(AuthError::Denied {
                capability: capability.to_string(),
            }
            .into()),
        }
    }

    pub async fn grant(&self, user_id: UserId, capability: Capability) -> DomainResult<()> {
        self.repository.grant(user_id, capability).await
    }

    /// Grant `capability` to each of `user_ids`, returning how many succeeded.
    ///
    /// Used to seed operators at startup; a failed grant is logged and skipped.
    pub async fn grant_to_all(&self, user_ids: &[UserId], capability: &Capability) -> usize {
        let mut granted = 0;
        for &user_id in user_ids {
            match self.repository.grant(user_id, capability.clone()).await {
                Ok(()) => {
                    info!(user_id, %capability, "Capability granted");
                    granted += 1;
                }
                Err(e) => warn!(user_id, %capability, error = %e, "Could not grant capability"),
            }
        }
        granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;
    use crate::repositories::MockPermissionRepository;

    #[tokio::test]
    async fn test_granted_capability_allowed() {
        let repo = Arc::new(MockPermissionRepository::new());
        let gate = PermissionGate::new(repo.clone());

        gate.grant(42, Capability::users_list()).await.unwrap();

        assert_eq!(gate.authorize(42, &Capability::users_list()).await, Decision::Allowed);
        assert_eq!(gate.authorize(7, &Capability::users_list()).await, Decision::Denied);
        assert_eq!(gate.authorize(42, &Capability::new("articles:delete")).await, Decision::Denied);
    }

    #[tokio::test]
    async fn test_grant_to_all() {
        let repo = Arc::new(MockPermissionRepository::new());
        let gate = PermissionGate::new(repo.clone());

        assert_eq!(gate.grant_to_all(&[1, 2], &Capability::users_list()).await, 2);
        assert_eq!(gate.authorize(1, &Capability::users_list()).await, Decision::Allowed);
        assert_eq!(gate.authorize(2, &Capability::users_list()).await, Decision::Allowed);
        assert_eq!(gate.authorize(3, &Capability::users_list()).await, Decision::Denied);

        repo.set_unavailable(true);
        assert_eq!(gate.grant_to_all(&[3], &Capability::users_list()).await, 0);
    }

    #[tokio::test]
    async fn test_store_failure_denies() {
        let repo = Arc::new(MockPermissionRepository::new());
        let gate = PermissionGate::new(repo.clone());
        gate.grant(42, Capability::users_list()).await.unwrap();

        repo.set_unavailable(true);
        assert_eq!(gate.authorize(42, &Capability::users_list()).await, Decision::Denied);

        let err = gate.require(42, &Capability::users_list()).await.unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::Denied { ref capability }) if capability == "users:list"));
    }
}
