use actix_web::{web, HttpResponse};

use scribe_core::repositories::{PermissionRepository, RevocationRepository, UserRepository};

use super::{validate, AppState};
use crate::dto::users::{ListUsersQuery, UsersResponse};
use crate::handlers::error::handle_domain_error;

/// Handler for GET /api/v1/users?limit=&offset=
///
/// Mounted behind `RequireCapability(users:list)`, so reaching this handler
/// already implies the caller is allowed to see every account.
pub async fn list_users<U, R, P>(
    state: web::Data<AppState<U, R, P>>,
    query: web::Query<ListUsersQuery>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    R: RevocationRepository + 'static,
    P: PermissionRepository + 'static,
{
    if let Err(response) = validate(&*query) {
        return response;
    }

    match state.auth_service.list_users(query.limit(), query.offset()).await {
        Ok(users) => HttpResponse::Ok().json(UsersResponse {
            status: "success",
            count: users.len(),
            users,
        }),
        Err(error) => handle_domain_error(&error),
    }
}
