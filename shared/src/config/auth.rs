//! Authentication and authorization configuration

use serde::{Deserialize, Serialize};

use super::{parse_or, ConfigError};

/// Identity token signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens (HS256)
    #[serde(skip_serializing)]
    pub secret: String,

    /// Token lifetime in seconds
    pub token_lifetime: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl JwtConfig {
    /// Create a new JWT configuration with secret and default lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            token_lifetime: default_token_lifetime(),
            issuer: String::from("scribe"),
            audience: String::from("scribe-api"),
        }
    }

    /// Set token lifetime in minutes
    pub fn with_lifetime_minutes(mut self, minutes: i64) -> Self {
        self.token_lifetime = minutes * 60;
        self
    }

    /// Set token lifetime in seconds
    pub fn with_lifetime_seconds(mut self, seconds: i64) -> Self {
        self.token_lifetime = seconds;
        self
    }
}

/// Password hashing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PasswordConfig {
    /// bcrypt cost factor
    pub hash_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self { hash_cost: 10 }
    }
}

/// Revocation log configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RevocationConfig {
    /// Upper bound for a single revocation store call, in milliseconds
    pub store_timeout_ms: u64,

    /// How often the retention task runs, in seconds
    pub cleanup_interval: u64,

    /// How long a record is kept after its token expired, in seconds
    pub retention_grace: i64,

    /// Whether the retention task runs at all
    pub cleanup_enabled: bool,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            store_timeout_ms: 2000,
            cleanup_interval: 3600, // 1 hour
            retention_grace: 3600,
            cleanup_enabled: true,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Password hashing configuration
    #[serde(default)]
    pub password: PasswordConfig,

    /// Revocation log configuration
    #[serde(default)]
    pub revocation: RevocationConfig,

    /// Accounts granted `users:list` at startup
    #[serde(default)]
    pub admin_user_ids: Vec<i64>,
}

impl AuthConfig {
    /// Create from an arbitrary variable source
    ///
    /// `JWT_SECRET` is mandatory in every environment.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                key: "JWT_SECRET".to_string(),
            })?;

        let token_lifetime = seconds_within(lookup, "JWT_TOKEN_LIFETIME", default_token_lifetime())?;

        let defaults = RevocationConfig::default();
        let revocation = RevocationConfig {
            store_timeout_ms: parse_or(lookup, "REVOCATION_STORE_TIMEOUT_MS", defaults.store_timeout_ms)?,
            cleanup_interval: parse_or(lookup, "REVOCATION_CLEANUP_INTERVAL", defaults.cleanup_interval)?,
            retention_grace: seconds_within(lookup, "REVOCATION_RETENTION_GRACE", defaults.retention_grace)?,
            cleanup_enabled: parse_or(lookup, "REVOCATION_CLEANUP_ENABLED", defaults.cleanup_enabled)?,
        };

        let admin_user_ids = match lookup("ADMIN_USER_IDS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| {
                    id.parse().map_err(|_| ConfigError::Invalid {
                        key: "ADMIN_USER_IDS".to_string(),
                        value: raw.clone(),
                    })
                })
                .collect::<Result<Vec<i64>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            jwt: JwtConfig::new(secret).with_lifetime_seconds(token_lifetime),
            password: PasswordConfig {
                hash_cost: parse_or(lookup, "PASSWORD_HASH_COST", PasswordConfig::default().hash_cost)?,
            },
            revocation,
            admin_user_ids,
        })
    }

    /// Token lifetime in seconds
    pub fn token_lifetime_seconds(&self) -> i64 {
        self.jwt.token_lifetime
    }
}

fn default_token_lifetime() -> i64 {
    86_400 // 24 hours
}

/// Upper bound for second-valued durations: one year
const MAX_DURATION_SECONDS: i64 = 366 * 86_400;

/// Parse a duration in whole seconds, within `1..=MAX_DURATION_SECONDS`
fn seconds_within<F>(lookup: &F, key: &str, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let seconds: i64 = parse_or(lookup, key, default)?;
    if (1..=MAX_DURATION_SECONDS).contains(&seconds) {
        Ok(seconds)
    } else {
        Err(ConfigError::Invalid {
            key: key.to_string(),
            value: seconds.to_string(),
        })
    }
}
