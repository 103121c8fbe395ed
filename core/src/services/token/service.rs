//! Token authority: issue, authenticate and revoke identity tokens

use std::future::Future;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, info, warn};

use crate::domain::entities::token::{
    AuthenticatedUser, Claims, IssuedToken, RevocationOutcome, RevokedToken,
};
use crate::domain::entities::user::UserId;
use crate::errors::{DomainError, TokenError};
use crate::repositories::RevocationRepository;

use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;

/// Service that signs identity tokens and consults the revocation log
pub struct TokenService<R: RevocationRepository> {
    pub(crate) repository: Arc<R>,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl<R: RevocationRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Returns
    ///
    /// `DomainError::Configuration` when the signing secret is empty
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Result<Self, DomainError> {
        if config.jwt_secret.trim().is_empty() {
            return Err(DomainError::Configuration {
                message: "token signing secret must not be empty".to_string(),
            });
        }
        if config.token_lifetime <= Duration::zero() {
            return Err(DomainError::Configuration {
                message: "token lifetime must be positive".to_string(),
            });
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        // Expiry is checked against the injected clock, not inside the decoder
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Ok(Self {
            repository,
            config,
            encoding_key,
            decoding_key,
            validation,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn token_lifetime(&self) -> Duration {
        self.config.token_lifetime
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Signs a token for `user_id` expiring one lifetime from now
    ///
    /// Issuing never touches the revocation log.
    pub fn issue(&self, user_id: UserId) -> Result<IssuedToken, DomainError> {
        let now = self.clock.now();
        let claims = Claims::new(
            user_id,
            now,
            self.config.token_lifetime,
            &self.config.issuer,
            &self.config.audience,
        )
        .ok_or_else(|| {
            warn!(user_id, "Token lifetime overflows the clock");
            TokenError::GenerationFailed
        })?;
        let expires_at = claims.expires_at().ok_or(TokenError::GenerationFailed)?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                warn!(user_id, error = %e, "Failed to sign token");
                TokenError::GenerationFailed
            })?;

        debug!(user_id, jti = %claims.jti, "Issued token");
        Ok(IssuedToken {
            token,
            expires_at,
            expires_in: claims.exp - claims.iat,
        })
    }

    /// Decides whether a presented token establishes an identity
    ///
    /// Checks run in order and stop at the first failure: presence,
    /// signature and claims, expiry, then the revocation log. A store that
    /// errors or does not answer within the configured timeout yields
    /// `StoreUnavailable`, never success.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<AuthenticatedUser, DomainError> {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return Err(TokenError::MissingToken.into()),
        };

        let claims = self.decode(token)?;
        let user_id = claims.user_id().ok_or(TokenError::MalformedToken)?;
        let expires_at = claims.expires_at().ok_or(TokenError::MalformedToken)?;

        if claims.is_expired_at(self.clock.now()) {
            return Err(TokenError::ExpiredToken.into());
        }

        let revoked = self
            .call_store("exists", self.repository.exists(token))
            .await?;
        if revoked {
            debug!(user_id, "Rejected revoked token");
            return Err(TokenError::RevokedToken.into());
        }

        Ok(AuthenticatedUser {
            user_id,
            token: token.to_string(),
            expires_at,
        })
    }

    /// Records `token` as revoked
    ///
    /// The token must carry a valid signature; forged tokens are rejected
    /// without writing. Already-expired tokens are acknowledged without a
    /// write. Revoking twice is acknowledged both times.
    pub async fn revoke(&self, token: &str) -> Result<(), DomainError> {
        if token.is_empty() {
            return Err(TokenError::MissingToken.into());
        }

        let claims = self.decode(token)?;
        let now = self.clock.now();
        if claims.is_expired_at(now) {
            debug!(sub = %claims.sub, "Skipping revocation of expired token");
            return Ok(());
        }
        let expires_at = claims.expires_at().ok_or(TokenError::MalformedToken)?;

        let record = RevokedToken::new(token, now, expires_at);
        match self.call_store("insert", self.repository.insert(record)).await? {
            RevocationOutcome::Inserted => info!(sub = %claims.sub, jti = %claims.jti, "Token revoked"),
            RevocationOutcome::AlreadyRevoked => debug!(sub = %claims.sub, "Token was already revoked"),
        }
        Ok(())
    }

    fn decode(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token failed verification");
                TokenError::MalformedToken.into()
            })
    }

    /// Bounds a revocation store call by the configured timeout
    async fn call_store<T, F>(&self, operation: &'static str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.config.store_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(operation, error = %e, "Revocation store call failed");
                Err(TokenError::StoreUnavailable.into())
            }
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.config.store_timeout.as_millis() as u64,
                    "Revocation store call timed out"
                );
                Err(TokenError::StoreUnavailable.into())
            }
        }
    }
}
