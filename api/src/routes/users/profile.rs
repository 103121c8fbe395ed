use actix_web::{web, HttpResponse};

use scribe_core::repositories::{PermissionRepository, RevocationRepository, UserRepository};

use super::{validate, AppState};
use crate::dto::users::{UpdateProfileRequest, UserResponse};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/user
pub async fn current_user<U, R, P>(
    state: web::Data<AppState<U, R, P>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationRepository + 'static,
    P: PermissionRepository + 'static,
{
    match state.auth_service.current_user(auth.user_id).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse {
            status: "success",
            user,
        }),
        Err(error) => handle_domain_error(&error),
    }
}

/// Handler for PUT /api/v1/user
///
/// Only the fields present in the body change. A new password is hashed
/// before it is stored; existing tokens stay valid.
pub async fn update_user<U, R, P>(
    state: web::Data<AppState<U, R, P>>,
    auth: AuthContext,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationRepository + 'static,
    P: PermissionRepository + 'static,
{
    if let Err(response) = validate(&*request) {
        return response;
    }

    match state
        .auth_service
        .update_profile(auth.user_id, request.into_inner().into())
        .await
    {
        Ok(user) => HttpResponse::Ok().json(UserResponse {
            status: "success",
            user,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
