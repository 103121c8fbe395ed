//! Shared fixtures for the API integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test, web, Error,
};
use actix_http::Request;
use chrono::Utc;
use serde_json::{json, Value};

use scribe_api::routes::AppState;
use scribe_core::services::{
    AuthService, BcryptHasher, ManualClock, PasswordHasher, PermissionGate, TokenService,
    TokenServiceConfig,
};
use scribe_infra::memory::{
    InMemoryPermissionRepository, InMemoryRevocationRepository, InMemoryUserRepository,
};

pub type TestState =
    AppState<InMemoryUserRepository, InMemoryRevocationRepository, InMemoryPermissionRepository>;

pub struct TestContext {
    pub state: web::Data<TestState>,
    pub revocations: Arc<InMemoryRevocationRepository>,
    pub permissions: Arc<InMemoryPermissionRepository>,
    pub clock: Arc<ManualClock>,
}

pub fn test_context() -> TestContext {
    let revocations = Arc::new(InMemoryRevocationRepository::new());
    let permissions = Arc::new(InMemoryPermissionRepository::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));

    let token_service = TokenService::new(
        Arc::clone(&revocations),
        TokenServiceConfig::new("integration-test-secret"),
    )
    .unwrap()
    .with_clock(clock.clone());

    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new(4));
    let auth_service = AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(token_service),
        hasher,
    );
    let gate = PermissionGate::new(Arc::clone(&permissions));

    TestContext {
        state: web::Data::new(AppState::new(Arc::new(auth_service), Arc::new(gate))),
        revocations,
        permissions,
        clock,
    }
}

/// Sign up `username` and return the created user's JSON
pub async fn signup<S, B>(app: &S, username: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "correct horse battery",
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(app, req).await;
    body["user"].clone()
}

/// Log in `username` and return the bearer token
pub async fn login<S, B>(app: &S, username: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({
            "identifier": username,
            "password": "correct horse battery",
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(app, req).await;
    body["token"].as_str().unwrap_or_default().to_string()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
