use actix_web::{web, HttpResponse};

use scribe_core::errors::{DomainError, TokenError};
use scribe_core::repositories::{PermissionRepository, RevocationRepository, UserRepository};

use super::AppState;
use crate::dto::users::{SignoutFailure, SignoutResponse};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/users/signout
///
/// Revokes the exact token the request was authenticated with. Signing out
/// twice with the same token cannot happen through this route, since the
/// second request is already rejected as revoked by the middleware.
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// { "status": 201, "message": "You are now logged out" }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: the revocation could not be recorded
///   (`{ "status": 401, "error": "You need to login" }`)
pub async fn signout<U, R, P>(
    state: web::Data<AppState<U, R, P>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationRepository + 'static,
    P: PermissionRepository + 'static,
{
    match state.auth_service.logout(&auth.token).await {
        Ok(()) => {
            log::info!("User {} signed out", auth.user_id);
            HttpResponse::Created().json(SignoutResponse {
                status: 201,
                message: "You are now logged out".to_string(),
            })
        }
        Err(DomainError::Token(TokenError::StoreUnavailable)) => {
            log::warn!("Sign-out for user {} could not be recorded", auth.user_id);
            HttpResponse::Unauthorized().json(SignoutFailure {
                status: 401,
                error: "You need to login".to_string(),
            })
        }
        Err(error) => handle_domain_error(&error),
    }
}
