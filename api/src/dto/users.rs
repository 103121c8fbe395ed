use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use scribe_core::domain::User;
use scribe_core::services::{NewAccount, ProfileChanges};

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+$").expect("username pattern is a valid regex")
});

/// Letters, digits, `_`, `.` and `-` only
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_PATTERN.is_match(username.trim()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("username_format");
        error.message = Some("username may only contain letters, digits, '_', '.' and '-'".into());
        Err(error)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 32), custom(function = "validate_username"))]
    pub username: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 64))]
    pub first_name: Option<String>,

    #[validate(length(max = 64))]
    pub last_name: Option<String>,

    #[validate(length(max = 64))]
    pub middle_name: Option<String>,
}

impl From<SignupRequest> for NewAccount {
    fn from(req: SignupRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            middle_name: req.middle_name,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username or email
    #[serde(alias = "username", alias = "email")]
    #[validate(length(min = 1, max = 255))]
    pub identifier: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 32), custom(function = "validate_username"))]
    pub username: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 64))]
    pub first_name: Option<String>,

    #[validate(length(max = 64))]
    pub last_name: Option<String>,

    #[validate(length(max = 64))]
    pub middle_name: Option<String>,

    #[validate(length(max = 1000))]
    pub bio: Option<String>,

    #[validate(url)]
    pub image: Option<String>,

    #[validate(length(min = 8, max = 128))]
    pub password: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            middle_name: req.middle_name,
            bio: req.bio,
            image: req.image,
            password: req.password,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListUsersQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,

    pub offset: Option<u32>,
}

impl ListUsersQuery {
    pub const DEFAULT_LIMIT: u32 = 20;

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupResponse {
    pub status: &'static str,
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub status: &'static str,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub status: &'static str,
    pub users: Vec<User>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignoutResponse {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignoutFailure {
    pub status: u16,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            first_name: None,
            last_name: None,
            middle_name: None,
        }
    }

    #[test]
    fn test_signup_validation() {
        assert!(signup("ada_l", "ada@example.com", "long enough").validate().is_ok());

        let errors = signup("a d", "not-an-email", "short").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_login_accepts_email_alias() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"email":"ada@example.com","password":"pw"}"#).unwrap();
        assert_eq!(req.identifier, "ada@example.com");
    }

    #[test]
    fn test_empty_update_is_valid() {
        assert!(UpdateProfileRequest::default().validate().is_ok());

        let bad = UpdateProfileRequest {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListUsersQuery { limit: None, offset: None };
        assert_eq!(query.limit(), 20);
        assert_eq!(query.offset(), 0);
        assert!(ListUsersQuery { limit: Some(500), offset: None }.validate().is_err());
    }
}
