//! Retention task for the revocation log
//!
//! Records are only useful while the token they name could still pass the
//! expiry check. Once a token has been expired for longer than the grace
//! period its record is deleted.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use scribe_shared::RevocationConfig;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::RevocationRepository;

use super::clock::{Clock, SystemClock};

/// Schedule for pruning the revocation log
#[derive(Debug, Clone)]
pub struct RevocationCleanupConfig {
    /// Seconds between prune cycles
    pub interval_seconds: u64,
    /// How long a record outlives its token
    pub grace_period: Duration,
    pub enabled: bool,
}

impl Default for RevocationCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60 * 60,
            grace_period: Duration::hours(1),
            enabled: true,
        }
    }
}

impl From<&RevocationConfig> for RevocationCleanupConfig {
    fn from(config: &RevocationConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval,
            grace_period: Duration::seconds(config.retention_grace),
            enabled: config.cleanup_enabled,
        }
    }
}

/// Service that prunes revocation records for long-expired tokens
pub struct RevocationCleanupService<R: RevocationRepository + 'static> {
    repository: Arc<R>,
    config: RevocationCleanupConfig,
    clock: Arc<dyn Clock>,
}

impl<R: RevocationRepository> RevocationCleanupService<R> {
    pub fn new(repository: Arc<R>, config: RevocationCleanupConfig) -> Self {
        Self {
            repository,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// One prune pass against [`retention_cutoff`]
    ///
    /// A store failure is reported in the result rather than as an error so
    /// the background loop keeps going.
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let mut result = CleanupResult::default();
        let Some(cutoff) = retention_cutoff(self.clock.now(), self.config.grace_period) else {
            error!(grace = %self.config.grace_period, "Retention grace is out of range, skipping prune");
            result.errors.push("retention grace out of range".to_string());
            return Ok(result);
        };

        match self.repository.prune_expired(cutoff).await {
            Ok(count) => {
                result.records_pruned = count;
                info!(count, %cutoff, "Pruned revocation records");
            }
            Err(e) => {
                error!(error = %e, "Could not prune revocation records");
                result.errors.push(e.to_string());
            }
        }

        Ok(result)
    }

    /// Spawn the prune loop on the current runtime; `None` when disabled
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Revocation cleanup is disabled");
            return None;
        }

        let period = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(every_secs = period.as_secs(), "Revocation cleanup scheduled");
            let mut ticker = tokio::time::interval(period);

            loop {
                ticker.tick().await;

                match self.run_cleanup().await {
                    Ok(report) if report.is_success() => {}
                    Ok(report) => warn!(errors = ?report.errors, "Revocation cleanup cycle had failures"),
                    Err(e) => error!(error = %e, "Revocation cleanup cycle aborted"),
                }
            }
        }))
    }
}

/// Records with `expires_at` before the returned instant may be deleted.
///
/// A token stays valid through its whole `exp` second, so the cutoff sits one
/// second further back than `now - grace`. Negative grace counts as zero: a
/// record is never pruned while its token could still authenticate.
pub(crate) fn retention_cutoff(now: DateTime<Utc>, grace: Duration) -> Option<DateTime<Utc>> {
    let grace = grace.max(Duration::zero());
    now.checked_sub_signed(grace)?
        .checked_sub_signed(Duration::seconds(1))
}

/// Outcome of one prune cycle
#[derive(Debug, Default)]
pub struct CleanupResult {
    pub records_pruned: usize,
    /// Store failures, rendered for logging
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
