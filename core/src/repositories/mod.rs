pub mod permission;
pub mod revocation;
pub mod user;

pub use permission::PermissionRepository;
pub use revocation::RevocationRepository;
pub use user::UserRepository;

#[cfg(test)]
pub use permission::MockPermissionRepository;
#[cfg(test)]
pub use revocation::{FailingRevocationRepository, MockRevocationRepository, StallingRevocationRepository};
#[cfg(test)]
pub use user::MockUserRepository;
