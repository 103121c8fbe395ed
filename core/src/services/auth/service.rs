//! Account service: registration, login, profile and logout

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::token::IssuedToken;
use crate::domain::entities::user::{NewUser, PasswordHash, User, UserId};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{RevocationRepository, UserRepository};
use crate::services::token::TokenService;

use super::password::PasswordHasher;

/// Registration input carrying the plaintext secret
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
}

/// Partial profile update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub password: Option<String>,
}

/// Successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub token: IssuedToken,
}

/// Authentication service for the account lifecycle
pub struct AuthService<U, R>
where
    U: UserRepository,
    R: RevocationRepository,
{
    /// User repository for database operations
    user_repository: Arc<U>,
    /// Token service for issuing and revoking tokens
    token_service: Arc<TokenService<R>>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<U, R> AuthService<U, R>
where
    U: UserRepository,
    R: RevocationRepository,
{
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService<R>>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            hasher,
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService<R>> {
        &self.token_service
    }

    /// Register a new account
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The persisted user
    /// * `Err(AuthError::UserAlreadyExists)` - Username or email is taken
    pub async fn register(&self, account: NewAccount) -> DomainResult<User> {
        let email = account.email.trim().to_lowercase();
        let username = account.username.trim().to_string();

        if self.user_repository.find_by_username(&username).await?.is_some() {
            return Err(AuthError::UserAlreadyExists { field: "username".to_string() }.into());
        }
        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists { field: "email".to_string() }.into());
        }

        let password_hash = self.hash_password(account.password).await?;
        let user = self
            .user_repository
            .create(NewUser {
                username,
                email,
                first_name: account.first_name,
                last_name: account.last_name,
                middle_name: account.middle_name,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "Registered new user");
        Ok(user)
    }

    /// Log in by username or email
    ///
    /// An unknown identifier, an inactive account and a wrong secret are
    /// indistinguishable to the caller.
    pub async fn login(&self, identifier: &str, password: &str) -> DomainResult<LoginResult> {
        let user = match self.user_repository.find_by_credential(identifier.trim()).await? {
            Some(user) if user.active => user,
            _ => {
                debug!("Login attempt for unknown or inactive account");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self.verify_password(password.to_string(), user.password_hash.clone()).await? {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.token_service.issue(user.id)?;
        info!(user_id = user.id, "User logged in");
        Ok(LoginResult { user, token })
    }

    /// Load the user an authenticated token belongs to
    pub async fn current_user(&self, user_id: UserId) -> DomainResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// Apply a partial profile update
    pub async fn update_profile(&self, user_id: UserId, changes: ProfileChanges) -> DomainResult<User> {
        let mut user = self.current_user(user_id).await?;

        if let Some(username) = changes.username {
            let username = username.trim().to_string();
            if !username.eq_ignore_ascii_case(&user.username) {
                self.ensure_available(self.user_repository.find_by_username(&username).await?, user_id, "username")?;
            }
            user.username = username;
        }
        if let Some(email) = changes.email {
            let email = email.trim().to_lowercase();
            if email != user.email {
                self.ensure_available(self.user_repository.find_by_email(&email).await?, user_id, "email")?;
            }
            user.email = email;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(middle_name) = changes.middle_name {
            user.middle_name = Some(middle_name);
        }
        if let Some(bio) = changes.bio {
            user.bio = Some(bio);
        }
        if let Some(image) = changes.image {
            user.image = Some(image);
        }
        if let Some(password) = changes.password {
            user.password_hash = self.hash_password(password).await?;
        }

        user.touch();
        let user = self.user_repository.update(user).await?;
        info!(user_id, "Updated profile");
        Ok(user)
    }

    pub async fn list_users(&self, limit: u32, offset: u32) -> DomainResult<Vec<User>> {
        self.user_repository.list(limit, offset).await
    }

    /// Revoke the presented token
    pub async fn logout(&self, token: &str) -> DomainResult<()> {
        self.token_service.revoke(token).await
    }

    fn ensure_available(&self, owner: Option<User>, user_id: UserId, field: &str) -> DomainResult<()> {
        match owner {
            Some(other) if other.id != user_id => {
                Err(AuthError::UserAlreadyExists { field: field.to_string() }.into())
            }
            _ => Ok(()),
        }
    }

    async fn hash_password(&self, password: String) -> DomainResult<PasswordHash> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing task failed: {}", e),
            })?
    }

    async fn verify_password(&self, password: String, hash: PasswordHash) -> DomainResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password verification task failed: {}", e),
            })
    }
}
