//! User repository trait defining the interface for user data persistence.

use async_trait::async_trait;

use crate::domain::entities::user::{NewUser, User, UserId};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Username and email lookups are case-insensitive. `create` and `update`
/// report a uniqueness clash as `AuthError::UserAlreadyExists` naming the
/// offending field.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by either username or email
    ///
    /// Username takes precedence when both could match.
    async fn find_by_credential(&self, identifier: &str) -> Result<Option<User>, DomainError> {
        if let Some(user) = self.find_by_username(identifier).await? {
            return Ok(Some(user));
        }
        self.find_by_email(identifier).await
    }

    /// Persist a new user and return it with its assigned id
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Replace the stored profile of an existing user
    ///
    /// # Returns
    /// * `Err(DomainError::Auth(AuthError::UserNotFound))` - No user with that id
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// List users ordered by id
    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<User>, DomainError>;
}
