//! Shared utilities and common types for the Scribe server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the process environment
//! - Error response structures and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, LoggingConfig,
    PasswordConfig, RevocationConfig, ServerConfig, StorageBackend,
};
pub use errors::{error_codes, ErrorResponse};
