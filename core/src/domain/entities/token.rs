//! Token entities for JWT-based authentication and revocation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID, unique per issuance
    pub jti: String,
}

impl Claims {
    /// Creates claims for a token issued at `issued_at`
    ///
    /// `None` when `issued_at + lifetime` is out of the representable range.
    pub fn new(
        user_id: UserId,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
        issuer: &str,
        audience: &str,
    ) -> Option<Self> {
        let expires_at = issued_at.checked_add_signed(lifetime)?;
        Some(Self {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Parses the subject back into a user id
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }

    /// A token is expired once the current second is past `exp`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// A freshly signed identity token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    /// Compact JWS string
    pub token: String,

    pub expires_at: DateTime<Utc>,

    /// Seconds until expiry at the time of issue
    pub expires_in: i64,
}

/// Identity established by a successful authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,

    /// The exact token string that was presented
    pub token: String,

    pub expires_at: DateTime<Utc>,
}

/// Revocation record for a logged-out token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedToken {
    /// The exact token string
    pub token: String,

    /// When the revocation was recorded
    pub revoked_at: DateTime<Utc>,

    /// Expiry carried by the token itself, used for retention
    pub expires_at: DateTime<Utc>,
}

impl RevokedToken {
    pub fn new(token: impl Into<String>, revoked_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            revoked_at,
            expires_at,
        }
    }

    /// Whether the record may be pruned at `cutoff`.
    ///
    /// Stores delete exactly the records with `expires_at < cutoff`; the
    /// cleanup service chooses a cutoff at which the token itself is past
    /// its final valid second (see `RevocationCleanupService`).
    pub fn is_prunable(&self, cutoff: DateTime<Utc>) -> bool {
        self.expires_at < cutoff
    }
}

/// Result of writing a revocation record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevocationOutcome {
    /// A new record was written
    Inserted,
    /// A record for this token already existed
    AlreadyRevoked,
}
