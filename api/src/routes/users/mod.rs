//! Account route handlers
//!
//! - Sign up and log in (public)
//! - Read and update the current user
//! - Sign out (revokes the presented token)
//! - List users (requires the `users:list` capability)

pub mod list;
pub mod login;
pub mod profile;
pub mod signout;
pub mod signup;

use std::sync::Arc;

use actix_web::HttpResponse;
use validator::Validate;

use scribe_core::repositories::{PermissionRepository, RevocationRepository, UserRepository};
use scribe_core::services::{AuthService, PermissionGate};

use crate::handlers::error::validation_error_response;

/// Application state that holds shared services
pub struct AppState<U, R, P>
where
    U: UserRepository,
    R: RevocationRepository,
    P: PermissionRepository,
{
    pub auth_service: Arc<AuthService<U, R>>,
    pub permission_gate: Arc<PermissionGate<P>>,
}

impl<U, R, P> AppState<U, R, P>
where
    U: UserRepository,
    R: RevocationRepository,
    P: PermissionRepository,
{
    pub fn new(auth_service: Arc<AuthService<U, R>>, permission_gate: Arc<PermissionGate<P>>) -> Self {
        Self {
            auth_service,
            permission_gate,
        }
    }
}

/// Run derive-based validation, turning failures into a 400 response
pub(crate) fn validate<T: Validate>(payload: &T) -> Result<(), HttpResponse> {
    payload.validate().map_err(|e| validation_error_response(&e))
}
