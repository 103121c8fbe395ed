pub mod permission;
pub mod token;
pub mod user;

pub use permission::{Capability, Decision};
pub use token::{AuthenticatedUser, Claims, IssuedToken, RevocationOutcome, RevokedToken};
pub use user::{NewUser, PasswordHash, User, UserId};
