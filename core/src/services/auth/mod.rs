//! Authentication service module
//!
//! Account registration and login, profile maintenance and logout on top of
//! the token service.

mod password;
mod service;


pub use password::{BcryptHasher, PasswordHasher};
pub use service::{AuthService, LoginResult, NewAccount, ProfileChanges};
