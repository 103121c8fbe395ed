//! # Infrastructure Layer
//!
//! Concrete storage for the Scribe backend.
//!
//! - **Database**: MySQL repositories using SQLx, plus pool management and
//!   embedded migrations
//! - **Memory**: process-local repositories for tests and single-node
//!   development
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

pub use scribe_core::errors::*;

/// MySQL repositories, pool and migrations
#[cfg(feature = "mysql")]
pub mod database;

/// Process-local repositories
pub mod memory;

/// Failures while bringing storage up, before any repository is in use
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),
}
