//! User entity representing a registered account in Scribe.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Numeric user identifier, carried in the `sub` claim of issued tokens
pub type UserId = i64;

/// A one-way password hash.
///
/// Only the password hasher and the persistence layer construct this type, so
/// plaintext never ends up in a field typed as a hash.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash previously produced by a `PasswordHasher` and loaded from storage
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// User entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: UserId,

    /// Unique handle, compared case-insensitively
    pub username: String,

    /// Unique email address, stored lowercase
    pub email: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,

    /// Short profile text
    pub bio: Option<String>,

    /// Avatar URL
    pub image: Option<String>,

    /// Inactive accounts cannot log in
    pub active: bool,

    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a persisted user from a registration record and its assigned id
    pub fn from_new(id: UserId, new_user: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            middle_name: new_user.middle_name,
            bio: None,
            image: None,
            active: true,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `identifier` names this user by username or email
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.username.eq_ignore_ascii_case(identifier) || self.email.eq_ignore_ascii_case(identifier)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Registration record handed to `UserRepository::create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub password_hash: PasswordHash,
}
