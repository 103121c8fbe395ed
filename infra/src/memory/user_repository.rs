use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use scribe_core::domain::entities::user::{NewUser, User, UserId};
use scribe_core::errors::{AuthError, DomainError};
use scribe_core::repositories::UserRepository;

#[derive(Default)]
struct UserTable {
    rows: BTreeMap<UserId, User>,
    next_id: UserId,
}

impl UserTable {
    /// First field of `username`/`email` already held by another user
    fn clash(&self, except: Option<UserId>, username: &str, email: &str) -> Option<&'static str> {
        let others: Vec<&User> = self.rows.values().filter(|u| Some(u.id) != except).collect();
        if others.iter().any(|u| u.username.eq_ignore_ascii_case(username)) {
            Some("username")
        } else if others.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            Some("email")
        } else {
            None
        }
    }
}

/// User store with sequential ids starting at 1
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut table = self.table.write().await;
        if let Some(field) = table.clash(None, &user.username, &user.email) {
            return Err(AuthError::UserAlreadyExists { field: field.to_string() }.into());
        }

        table.next_id += 1;
        let created = User::from_new(table.next_id, user, Utc::now());
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&user.id) {
            return Err(AuthError::UserNotFound.into());
        }
        if let Some(field) = table.clash(Some(user.id), &user.username, &user.email) {
            return Err(AuthError::UserAlreadyExists { field: field.to_string() }.into());
        }

        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<User>, DomainError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::domain::entities::user::PasswordHash;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            first_name: None,
            last_name: None,
            middle_name: None,
            password_hash: PasswordHash::from_stored("$2b$04$abc"),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(new_user("ada", "ada@example.com")).await.unwrap();
        let b = repo.create(new_user("grace", "grace@example.com")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(repo.find_by_credential("GRACE@example.com").await.unwrap().unwrap().id, 2);
    }

    #[tokio::test]
    async fn test_unique_fields() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("ada", "ada@example.com")).await.unwrap();

        let err = repo.create(new_user("Ada", "x@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::UserAlreadyExists { ref field }) if field == "username"));
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let repo = InMemoryUserRepository::new();
        let mut ghost = repo.create(new_user("ada", "ada@example.com")).await.unwrap();
        ghost.id = 99;

        let err = repo.update(ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::Auth(AuthError::UserNotFound)));
    }
}
