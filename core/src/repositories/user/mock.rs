//! Map-backed `UserRepository` used by the service tests

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::user::{NewUser, User, UserId};
use crate::errors::{AuthError, DomainError};

use super::trait_::UserRepository;

/// Ids are assigned sequentially; uniqueness is case-insensitive
pub struct MockUserRepository {
    users: Arc<RwLock<BTreeMap<UserId, User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Name of the first field another account already holds
fn clash(
    users: &BTreeMap<UserId, User>,
    candidate_id: Option<UserId>,
    username: &str,
    email: &str,
) -> Option<&'static str> {
    let others = users.values().filter(|u| Some(u.id) != candidate_id);
    for u in others {
        if u.username.eq_ignore_ascii_case(username) {
            return Some("username");
        }
        if u.email.eq_ignore_ascii_case(email) {
            return Some("email");
        }
    }
    None
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if let Some(field) = clash(&users, None, &user.username, &user.email) {
            return Err(AuthError::UserAlreadyExists { field: field.to_string() }.into());
        }
        let id = users.keys().next_back().copied().unwrap_or(0) + 1;
        let created = User::from_new(id, user, Utc::now());
        users.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(AuthError::UserNotFound.into());
        }
        if let Some(field) = clash(&users, Some(user.id), &user.username, &user.email) {
            return Err(AuthError::UserAlreadyExists { field: field.to_string() }.into());
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
