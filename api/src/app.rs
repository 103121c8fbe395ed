//! Application factory
//!
//! Builds the actix-web `App` from shared state. Used by the binary for every
//! worker and by the integration tests; the binary adds the access logger on
//! top.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};

use scribe_core::domain::Capability;
use scribe_core::repositories::{PermissionRepository, RevocationRepository, UserRepository};

use crate::handlers::error::{json_error_handler, not_found, query_error_handler};
use crate::middleware::{Authenticator, JwtAuth, RequireCapability};
use crate::routes::users::{
    list::list_users,
    login::login,
    profile::{current_user, update_user},
    signout::signout,
    signup::signup,
    AppState,
};

/// Create and configure the application with all dependencies
pub fn create_app<U, R, P>(
    app_state: web::Data<AppState<U, R, P>>,
    cors: Cors,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    R: RevocationRepository + 'static,
    P: PermissionRepository + 'static,
{
    let authenticator: Arc<dyn Authenticator> = app_state.auth_service.token_service().clone();
    let jwt = JwtAuth::new(authenticator);
    let list_guard = RequireCapability::new(
        Arc::clone(&app_state.permission_gate),
        Capability::users_list(),
    );

    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(cors)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .route("/users", web::post().to(signup::<U, R, P>))
                .route(
                    "/users",
                    web::get()
                        .to(list_users::<U, R, P>)
                        .wrap(list_guard)
                        .wrap(jwt.clone()),
                )
                .route("/users/login", web::post().to(login::<U, R, P>))
                .route(
                    "/users/signout",
                    web::post().to(signout::<U, R, P>).wrap(jwt.clone()),
                )
                .route(
                    "/user",
                    web::get().to(current_user::<U, R, P>).wrap(jwt.clone()),
                )
                .route("/user", web::put().to(update_user::<U, R, P>).wrap(jwt)),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "scribe-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
