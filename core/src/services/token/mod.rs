//! Token service module
//!
//! Issues HS256 identity tokens, authenticates presented tokens against the
//! revocation log and records logouts. A background task prunes revocation
//! records once their tokens are long expired.

mod cleanup;
mod clock;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, RevocationCleanupConfig, RevocationCleanupService};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TokenServiceConfig;
pub use service::TokenService;
