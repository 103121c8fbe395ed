//! Domain layer containing entities and business rules

pub mod entities;

pub use entities::{
    AuthenticatedUser, Capability, Claims, Decision, IssuedToken, NewUser, PasswordHash,
    RevocationOutcome, RevokedToken, User, UserId,
};
