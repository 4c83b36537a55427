use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::DateTime;
use chrono::SubsecRound;
use chrono::Utc;
use serde::Serialize;

use crate::backend::KeyCache;
use crate::claims::is_reserved;
use crate::claims::Claims;
use crate::claims::EMAIL_CLAIM;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::SecurityConfig;
use crate::errors::TokenError;
use crate::registry::BackendRegistry;

/// Result of a successful issuance.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IssuedToken {
    /// Compact signed token
    pub token: String,
    /// Same instant as the token's `exp` claim
    pub expires_at: DateTime<Utc>,
}

/// Builds the standard claim set for a subject and signs it.
pub struct TokenIssuer {
    config: Arc<SecurityConfig>,
    registry: Arc<BackendRegistry>,
    clock: Arc<dyn Clock>,
    key: KeyCache,
}

impl TokenIssuer {
    /// Create an issuer reading the wall clock.
    pub fn new(config: Arc<SecurityConfig>, registry: Arc<BackendRegistry>) -> Self {
        Self {
            config,
            registry,
            clock: Arc::new(SystemClock),
            key: KeyCache::default(),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Resolve the backend and derive key material now instead of on first use.
    ///
    /// # Errors
    /// * `Configuration` - Unknown algorithm or unusable key material
    /// * `UnsupportedAlgorithm` - No backend registered for the algorithm
    pub fn warm_up(&self) -> Result<(), TokenError> {
        let backend = self.registry.select(self.config.signing_algorithm()?)?;
        self.key.get_or_derive(backend, &self.config)?;
        Ok(())
    }

    /// Issue a token for `subject`.
    ///
    /// # Errors
    /// See [`TokenIssuer::generate_with_claims`].
    pub fn generate(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.generate_with_claims(subject, BTreeMap::new())
    }

    /// Issue a token for `subject` carrying additional claims.
    ///
    /// `sub` and `email` are set to the subject; `iat` and `nbf` to now; `exp`
    /// to now plus the configured lifetime; `aud` and `iss` only when configured.
    /// Extra claims that use a reserved name are dropped.
    ///
    /// # Errors
    /// * `Configuration` - Unknown algorithm, bad lifetime, or unusable key material
    /// * `UnsupportedAlgorithm` - No backend registered for the algorithm
    /// * `MalformedToken` - Subject is empty
    /// * `EncodingFailed` - Signing failed
    pub fn generate_with_claims(
        &self,
        subject: &str,
        extra: BTreeMap<String, serde_json::Value>,
    ) -> Result<IssuedToken, TokenError> {
        let algorithm = self.config.signing_algorithm()?;
        let backend = self.registry.select(algorithm)?;

        if subject.trim().is_empty() {
            return Err(TokenError::missing_claim("sub"));
        }

        let lifetime = self.config.lifetime()?;
        let key = self.key.get_or_derive(backend, &self.config)?;

        let now = self.clock.now().trunc_subsecs(0);
        let expires_at = now + lifetime;

        let mut claims = Claims::new()
            .with_subject(subject)
            .with_extra(EMAIL_CLAIM, subject)
            .with_issued_at(now.timestamp())
            .with_not_before(now.timestamp())
            .with_expiration(expires_at.timestamp());

        if let Some(audience) = self.config.audience() {
            claims = claims.with_audience(audience);
        }
        if let Some(issuer) = self.config.issuer() {
            claims = claims.with_issuer(issuer);
        }

        for (name, value) in extra {
            if is_reserved(&name) {
                tracing::debug!(claim = %name, "Dropping reserved claim supplied by caller");
                continue;
            }
            claims.extra.insert(name, value);
        }

        let token = backend.sign(&claims, key)?;

        tracing::debug!(
            subject = %subject,
            algorithm = %algorithm,
            expires_at = %expires_at,
            "Token issued"
        );

        Ok(IssuedToken { token, expires_at })
    }
}
