use std::collections::BTreeMap;
use std::sync::Arc;

use crate::claims::Claims;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::SecurityConfig;
use crate::errors::TokenError;
use crate::issuer::IssuedToken;
use crate::issuer::TokenIssuer;
use crate::registry::BackendRegistry;
use crate::validator::TokenValidator;
use crate::validator::ValidationResult;

/// Token coordinator combining issuance and validation.
///
/// Both halves share one configuration and one backend registry.
pub struct TokenService {
    issuer: TokenIssuer,
    validator: TokenValidator,
}

impl TokenService {
    /// Create a service with every standard backend and the wall clock.
    ///
    /// Configuration problems surface on first use; see [`TokenService::start`]
    /// to fail early.
    pub fn new(config: SecurityConfig) -> Self {
        Self::with_parts(
            Arc::new(config),
            Arc::new(BackendRegistry::standard()),
            Arc::new(SystemClock),
        )
    }

    /// Create a service from explicit collaborators.
    pub fn with_parts(
        config: Arc<SecurityConfig>,
        registry: Arc<BackendRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            issuer: TokenIssuer::new(Arc::clone(&config), Arc::clone(&registry))
                .with_clock(Arc::clone(&clock)),
            validator: TokenValidator::new(config, registry).with_clock(clock),
        }
    }

    /// Create a service and check the whole deployment before returning it.
    ///
    /// # Errors
    /// * `Configuration` - Unknown algorithm, missing audience, bad lifetime,
    ///   or unusable key material
    /// * `UnsupportedAlgorithm` - No backend registered for the algorithm
    pub fn start(config: SecurityConfig) -> Result<Self, TokenError> {
        let algorithm = config.validate()?;
        let service = Self::new(config);

        service.issuer.warm_up()?;
        service.validator.warm_up()?;

        tracing::info!(algorithm = %algorithm, "Token service ready");

        Ok(service)
    }

    /// Issue a token for an already authenticated subject.
    ///
    /// # Errors
    /// See [`TokenIssuer::generate_with_claims`].
    pub fn generate(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.issuer.generate(subject)
    }

    /// Issue a token carrying additional claims.
    ///
    /// # Errors
    /// See [`TokenIssuer::generate_with_claims`].
    pub fn generate_with_claims(
        &self,
        subject: &str,
        extra: BTreeMap<String, serde_json::Value>,
    ) -> Result<IssuedToken, TokenError> {
        self.issuer.generate_with_claims(subject, extra)
    }

    /// Validate a token.
    ///
    /// # Errors
    /// See [`TokenValidator::validate`].
    pub fn validate(&self, token: &str) -> ValidationResult {
        self.validator.validate(token)
    }

    /// Decode a token without verifying it.
    ///
    /// # Errors
    /// See [`TokenValidator::inspect`].
    pub fn inspect(&self, token: &str) -> Result<Claims, TokenError> {
        self.validator.inspect(token)
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }
}
