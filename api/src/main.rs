use std::sync::Arc;

use actix_web::{
    middleware::{Condition, Logger},
    web, HttpServer,
};
use dotenv::dotenv;
use log::{error, info};

use scribe_api::app::create_app;
use scribe_api::middleware::cors::create_cors;
use scribe_api::routes::AppState;
use scribe_core::domain::Capability;
use scribe_core::repositories::{PermissionRepository, RevocationRepository, UserRepository};
use scribe_core::services::{
    AuthService, BcryptHasher, PasswordHasher, PermissionGate, RevocationCleanupConfig,
    RevocationCleanupService, TokenService, TokenServiceConfig,
};
use scribe_infra::database::{
    DatabasePool, MySqlPermissionRepository, MySqlRevocationRepository, MySqlUserRepository,
};
use scribe_infra::memory::{
    InMemoryPermissionRepository, InMemoryRevocationRepository, InMemoryUserRepository,
};
use scribe_shared::{AppConfig, StorageBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = AppConfig::from_env();
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(level));

    let config = config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Starting Scribe API Server ({} environment)", config.environment);

    match config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory storage; state is lost on restart");
            serve(
                config,
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryRevocationRepository::new()),
                Arc::new(InMemoryPermissionRepository::new()),
            )
            .await
        }
        StorageBackend::Mysql => {
            let pool = DatabasePool::new(config.database.clone()).await?;
            pool.run_migrations().await?;
            info!("{}", pool.get_statistics());

            let db = pool.get_pool().clone();
            let result = serve(
                config,
                Arc::new(MySqlUserRepository::new(db.clone())),
                Arc::new(MySqlRevocationRepository::new(db.clone())),
                Arc::new(MySqlPermissionRepository::new(db)),
            )
            .await;

            pool.close().await;
            result
        }
    }
}

/// Wire services over the chosen repositories and run the HTTP server
async fn serve<U, R, P>(
    config: AppConfig,
    users: Arc<U>,
    revocations: Arc<R>,
    permissions: Arc<P>,
) -> anyhow::Result<()>
where
    U: UserRepository + 'static,
    R: RevocationRepository + 'static,
    P: PermissionRepository + 'static,
{
    let token_service = Arc::new(TokenService::new(
        Arc::clone(&revocations),
        TokenServiceConfig::from(&config.auth),
    )?);
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new(config.auth.password.hash_cost));
    let auth_service = Arc::new(AuthService::new(users, token_service, hasher));
    let permission_gate = Arc::new(PermissionGate::new(permissions));
    if !config.auth.admin_user_ids.is_empty() {
        let granted = permission_gate
            .grant_to_all(&config.auth.admin_user_ids, &Capability::users_list())
            .await;
        info!("Seeded users:list for {} of {} admin accounts", granted, config.auth.admin_user_ids.len());
    }

    let cleanup = Arc::new(RevocationCleanupService::new(
        revocations,
        RevocationCleanupConfig::from(&config.auth.revocation),
    ));
    let cleanup_task = cleanup.start_background_task();

    let app_state = web::Data::new(AppState::new(auth_service, permission_gate));
    let server_config = config.server.clone();
    let environment = config.environment;
    let access_log = config.logging.access_log;

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        create_app(app_state.clone(), create_cors(&server_config, environment))
            .wrap(Condition::new(access_log, Logger::default()))
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_address)?.run().await?;

    if let Some(handle) = cleanup_task {
        handle.abort();
    }
    info!("Server stopped");
    Ok(())
}
