//! Business services
//!
//! - `token`: identity token issue, authentication and revocation
//! - `auth`: account registration, login and profile
//! - `authorization`: capability checks

pub mod auth;
pub mod authorization;
pub mod token;

pub use auth::{AuthService, BcryptHasher, LoginResult, NewAccount, PasswordHasher, ProfileChanges};
pub use authorization::PermissionGate;
pub use token::{
    CleanupResult, Clock, ManualClock, RevocationCleanupConfig, RevocationCleanupService,
    SystemClock, TokenService, TokenServiceConfig,
};
