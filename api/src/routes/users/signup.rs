use actix_web::{web, HttpResponse};

use scribe_core::repositories::{PermissionRepository, RevocationRepository, UserRepository};

use super::{validate, AppState};
use crate::dto::users::{SignupRequest, SignupResponse};
use crate::handlers::error::handle_domain_error;

/// Handler for POST /api/v1/users
///
/// # Request Body
///
/// ```json
/// {
///     "username": "ada",
///     "email": "ada@example.com",
///     "password": "correct horse",
///     "first_name": "Ada"
/// }
/// ```
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "status": "success",
///     "message": "User created successfully",
///     "user": { "id": 1, "username": "ada", ... }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Validation failure, username or email already taken
pub async fn signup<U, R, P>(
    state: web::Data<AppState<U, R, P>>,
    request: web::Json<SignupRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationRepository + 'static,
    P: PermissionRepository + 'static,
{
    if let Err(response) = validate(&*request) {
        return response;
    }

    match state.auth_service.register(request.into_inner().into()).await {
        Ok(user) => HttpResponse::Created().json(SignupResponse {
            status: "success",
            message: "User created successfully".to_string(),
            user,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
