//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError};

use scribe_shared::{error_codes, ConfigError};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Stable machine-readable code for responses and logs
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => error_codes::VALIDATION_ERROR,
            DomainError::NotFound { .. } => error_codes::NOT_FOUND,
            DomainError::Configuration { .. } | DomainError::Internal { .. } => {
                error_codes::INTERNAL_ERROR
            }
            DomainError::Auth(e) => e.code(),
            DomainError::Token(e) => e.code(),
        }
    }
}

impl From<ConfigError> for DomainError {
    fn from(err: ConfigError) -> Self {
        DomainError::Configuration {
            message: err.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_bridge_through() {
        assert_eq!(DomainError::from(TokenError::RevokedToken).code(), "REVOKED_TOKEN");
        assert_eq!(
            DomainError::from(AuthError::UserAlreadyExists { field: "email".into() }).code(),
            "USER_ALREADY_EXISTS"
        );
        assert_eq!(
            DomainError::Internal { message: "boom".into() }.code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::from(AuthError::UserAlreadyExists { field: "username".into() });
        assert_eq!(err.to_string(), "A user with this username already exists");

        let err = DomainError::from(ConfigError::Missing { key: "JWT_SECRET".into() });
        assert!(err.to_string().contains("JWT_SECRET"));
    }
}
