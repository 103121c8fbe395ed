//! In-memory repository implementations
//!
//! State lives in the process, so these suit tests and single-instance
//! development only. Selected with `STORAGE_BACKEND=memory`.

mod permission_repository;
mod revocation_repository;
mod user_repository;

pub use permission_repository::InMemoryPermissionRepository;
pub use revocation_repository::InMemoryRevocationRepository;
pub use user_repository::InMemoryUserRepository;
