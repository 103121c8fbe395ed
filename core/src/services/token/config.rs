//! Configuration for the token service

use chrono::Duration;
use scribe_shared::AuthConfig;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Lifetime of every issued token
    pub token_lifetime: Duration,
    /// Expected `iss` claim
    pub issuer: String,
    /// Expected `aud` claim
    pub audience: String,
    /// Upper bound for one revocation store call
    pub store_timeout: std::time::Duration,
}

impl TokenServiceConfig {
    /// Config with the given secret and the stock lifetime of 24 hours
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_lifetime: Duration::hours(24),
            issuer: String::from("scribe"),
            audience: String::from("scribe-api"),
            store_timeout: std::time::Duration::from_millis(2000),
        }
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    pub fn with_store_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.store_timeout = timeout;
        self
    }
}

impl From<&AuthConfig> for TokenServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            jwt_secret: config.jwt.secret.clone(),
            token_lifetime: Duration::seconds(config.jwt.token_lifetime),
            issuer: config.jwt.issuer.clone(),
            audience: config.jwt.audience.clone(),
            store_timeout: std::time::Duration::from_millis(config.revocation.store_timeout_ms),
        }
    }
}
