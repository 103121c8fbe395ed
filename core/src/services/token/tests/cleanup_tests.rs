use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::token::RevokedToken;
use crate::repositories::{FailingRevocationRepository, MockRevocationRepository, RevocationRepository};
use crate::errors::{DomainError, TokenError};
use crate::services::token::cleanup::retention_cutoff;
use crate::services::token::{
    ManualClock, RevocationCleanupConfig, RevocationCleanupService, TokenService, TokenServiceConfig,
};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn test_prunes_only_past_grace() {
    let repo = Arc::new(MockRevocationRepository::new());
    let grace = Duration::hours(1);

    // Expired two hours ago: past grace
    repo.insert(RevokedToken::new("old", now() - Duration::hours(5), now() - Duration::hours(2)))
        .await
        .unwrap();
    // Expired thirty minutes ago: still inside grace
    repo.insert(RevokedToken::new("recent", now() - Duration::hours(1), now() - Duration::minutes(30)))
        .await
        .unwrap();
    // Still valid
    repo.insert(RevokedToken::new("live", now(), now() + Duration::hours(1)))
        .await
        .unwrap();

    let service = RevocationCleanupService::new(
        repo.clone(),
        RevocationCleanupConfig { interval_seconds: 60, grace_period: grace, enabled: true },
    )
    .with_clock(Arc::new(ManualClock::new(now())));

    let result = service.run_cleanup().await.unwrap();
    assert!(result.is_success());
    assert_eq!(result.records_pruned, 1);
    assert!(repo.get("old").await.is_none());
    assert!(repo.get("recent").await.is_some());
    assert!(repo.get("live").await.is_some());
}

#[tokio::test]
async fn test_disabled_cleanup_is_noop() {
    let repo = Arc::new(MockRevocationRepository::new());
    repo.insert(RevokedToken::new("old", now() - Duration::days(3), now() - Duration::days(2)))
        .await
        .unwrap();

    let service = Arc::new(
        RevocationCleanupService::new(
            repo.clone(),
            RevocationCleanupConfig { enabled: false, ..Default::default() },
        )
        .with_clock(Arc::new(ManualClock::new(now()))),
    );

    let result = service.run_cleanup().await.unwrap();
    assert_eq!(result.records_pruned, 0);
    assert_eq!(repo.len().await, 1);
    assert!(service.start_background_task().is_none());
}

#[tokio::test]
async fn test_store_failure_reported_in_result() {
    let service = RevocationCleanupService::new(
        Arc::new(FailingRevocationRepository),
        RevocationCleanupConfig::default(),
    );

    let result = service.run_cleanup().await.unwrap();
    assert!(!result.is_success());
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_runs_on_interval() {
    let repo = Arc::new(MockRevocationRepository::new());
    repo.insert(RevokedToken::new("old", now() - Duration::days(3), now() - Duration::days(2)))
        .await
        .unwrap();

    let service = Arc::new(
        RevocationCleanupService::new(
            repo.clone(),
            RevocationCleanupConfig { interval_seconds: 10, ..Default::default() },
        )
        .with_clock(Arc::new(ManualClock::new(now()))),
    );

    let handle = service.start_background_task().unwrap();
    // First tick fires immediately
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(repo.len().await, 0);

    handle.abort();
}

fn cleanup_with_grace(
    repo: Arc<MockRevocationRepository>,
    clock: Arc<ManualClock>,
    grace: Duration,
) -> RevocationCleanupService<MockRevocationRepository> {
    RevocationCleanupService::new(
        repo,
        RevocationCleanupConfig { interval_seconds: 60, grace_period: grace, enabled: true },
    )
    .with_clock(clock)
}

#[tokio::test]
async fn test_zero_grace_keeps_record_through_final_second() {
    let clock = Arc::new(ManualClock::new(now()));
    let repo = Arc::new(MockRevocationRepository::new());
    let tokens = TokenService::new(
        repo.clone(),
        TokenServiceConfig::new("cleanup-secret").with_lifetime(Duration::hours(1)),
    )
    .unwrap()
    .with_clock(clock.clone());

    let issued = tokens.issue(42).unwrap();
    tokens.revoke(&issued.token).await.unwrap();

    // Half a second into the `exp` second the token would still verify
    clock.advance(Duration::hours(1) + Duration::milliseconds(500));
    let cleanup = cleanup_with_grace(repo.clone(), clock.clone(), Duration::zero());
    assert_eq!(cleanup.run_cleanup().await.unwrap().records_pruned, 0);
    assert!(matches!(
        tokens.authenticate(Some(&issued.token)).await,
        Err(DomainError::Token(TokenError::RevokedToken))
    ));

    clock.advance(Duration::seconds(2));
    assert_eq!(cleanup.run_cleanup().await.unwrap().records_pruned, 1);
    assert!(matches!(
        tokens.authenticate(Some(&issued.token)).await,
        Err(DomainError::Token(TokenError::ExpiredToken))
    ));
}

#[tokio::test]
async fn test_negative_grace_never_prunes_live_tokens() {
    let clock = Arc::new(ManualClock::new(now()));
    let repo = Arc::new(MockRevocationRepository::new());
    let tokens = TokenService::new(
        repo.clone(),
        TokenServiceConfig::new("cleanup-secret").with_lifetime(Duration::hours(1)),
    )
    .unwrap()
    .with_clock(clock.clone());

    let issued = tokens.issue(42).unwrap();
    tokens.revoke(&issued.token).await.unwrap();

    let cleanup = cleanup_with_grace(repo.clone(), clock, Duration::hours(-2));
    assert_eq!(cleanup.run_cleanup().await.unwrap().records_pruned, 0);
    assert!(matches!(
        tokens.authenticate(Some(&issued.token)).await,
        Err(DomainError::Token(TokenError::RevokedToken))
    ));
}

#[test]
fn test_retention_cutoff() {
    assert_eq!(
        retention_cutoff(now(), Duration::hours(1)),
        Some(now() - Duration::hours(1) - Duration::seconds(1))
    );
    assert_eq!(retention_cutoff(now(), Duration::hours(-3)), Some(now() - Duration::seconds(1)));
    assert_eq!(retention_cutoff(now(), Duration::days(365 * 300_000)), None);
}
