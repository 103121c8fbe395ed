use actix_web::{web, HttpResponse};

use scribe_core::repositories::{PermissionRepository, RevocationRepository, UserRepository};

use super::{validate, AppState};
use crate::dto::users::{LoginRequest, LoginResponse};
use crate::handlers::error::handle_domain_error;

/// Handler for POST /api/v1/users/login
///
/// Accepts `identifier` (or its aliases `username` / `email`) and `password`.
/// Returns the user together with a freshly issued bearer token. Unknown
/// accounts and wrong passwords both answer 401 `INVALID_CREDENTIALS`.
pub async fn login<U, R, P>(
    state: web::Data<AppState<U, R, P>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationRepository + 'static,
    P: PermissionRepository + 'static,
{
    if let Err(response) = validate(&*request) {
        return response;
    }

    match state.auth_service.login(&request.identifier, &request.password).await {
        Ok(result) => HttpResponse::Ok().json(LoginResponse {
            user: result.user,
            token: result.token.token,
            expires_in: result.token.expires_in,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
