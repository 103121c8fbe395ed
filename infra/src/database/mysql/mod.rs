//! MySQL repository implementations

mod permission_repository_impl;
mod revocation_repository_impl;
mod user_repository_impl;

pub use permission_repository_impl::MySqlPermissionRepository;
pub use revocation_repository_impl::MySqlRevocationRepository;
pub use user_repository_impl::MySqlUserRepository;

use scribe_core::errors::DomainError;

/// Wrap a driver error with the operation that failed
pub(crate) fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::Internal {
        message: format!("{}: {}", context, e),
    }
}

/// Whether the driver reported a unique key violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
