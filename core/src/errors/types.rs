//! Error types for authentication, token handling and authorization
//!
//! Each variant carries a stable machine-readable code. HTTP status mapping
//! lives in the presentation layer.

use scribe_shared::error_codes;
use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("No token was presented")]
    MissingToken,

    #[error("Token is malformed or its signature is invalid")]
    MalformedToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Token has been revoked")]
    RevokedToken,

    #[error("Revocation store is unavailable")]
    StoreUnavailable,

    #[error("Token generation failed")]
    GenerationFailed,
}

impl TokenError {
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::MissingToken => error_codes::MISSING_TOKEN,
            TokenError::MalformedToken => error_codes::MALFORMED_TOKEN,
            TokenError::ExpiredToken => error_codes::EXPIRED_TOKEN,
            TokenError::RevokedToken => error_codes::REVOKED_TOKEN,
            TokenError::StoreUnavailable => error_codes::STORE_UNAVAILABLE,
            TokenError::GenerationFailed => error_codes::INTERNAL_ERROR,
        }
    }
}

/// Authentication and authorization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid username/email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("A user with this {field} already exists")]
    UserAlreadyExists { field: String },

    #[error("Missing capability: {capability}")]
    Denied { capability: String },
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
            AuthError::UserNotFound => error_codes::NOT_FOUND,
            AuthError::UserAlreadyExists { .. } => error_codes::USER_ALREADY_EXISTS,
            AuthError::Denied { .. } => error_codes::FORBIDDEN,
        }
    }
}
