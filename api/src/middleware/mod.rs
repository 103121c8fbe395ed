pub mod auth;
pub mod capability;
pub mod cors;

pub use auth::*;
pub use capability::*;
pub use cors::*;
