use std::sync::Arc;

use crate::backend::KeyCache;
use crate::backend::KeyMaterial;
use crate::backend::SigningBackend;
use crate::claims::Claims;
use crate::claims::Principal;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::SecurityConfig;
use crate::errors::TokenError;
use crate::registry::BackendRegistry;
use crate::token;

/// Outcome of validating one token.
pub type ValidationResult = Result<Principal, TokenError>;

/// Verifies tokens against the configured trust rules.
///
/// Validation is a pure function of the token, the configuration and the
/// clock; it never retries and never mutates shared state after the key
/// material has been derived once.
pub struct TokenValidator {
    config: Arc<SecurityConfig>,
    registry: Arc<BackendRegistry>,
    clock: Arc<dyn Clock>,
    key: KeyCache,
}

impl TokenValidator {
    /// Create a validator reading the wall clock.
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

    /// Run the deployment checks and derive key material ahead of traffic.
    ///
    /// # Errors
    /// * `Configuration` - Unknown algorithm, missing audience, or unusable key material
    /// * `UnsupportedAlgorithm` - No backend registered for the algorithm
    pub fn warm_up(&self) -> Result<(), TokenError> {
        self.resolve().map(|_| ())
    }

    /// Validate a token and return the principal it authenticates.
    ///
    /// Stages, each short-circuiting:
    /// 1. deployment checks: algorithm recognized and registered, audience set,
    ///    key material derivable (before the token is looked at)
    /// 2. structural parse of the three segments
    /// 3. signature verification with the configured algorithm, never the one
    ///    the token declares
    /// 4. claim policy: expiry, not-before, audience, issuer, subject; all are
    ///    evaluated and the first violation in that order is returned
    ///
    /// # Errors
    /// * `Configuration` / `UnsupportedAlgorithm` - Stage 1
    /// * `MalformedToken` - Undecodable token or missing required claim
    /// * `InvalidSignature` - Bad signature, algorithm substitution, or `nbf` in the future
    /// * `TokenExpired` - `exp` has passed
    /// * `InvalidAudience` / `InvalidIssuer` - Claim does not match configuration
    pub fn validate(&self, token: &str) -> ValidationResult {
        let result = self.run(token);

        if let Err(err) = &result {
            if err.is_configuration() {
                tracing::error!(kind = err.kind().as_str(), error = %err, "Token validation misconfigured");
            } else {
                tracing::warn!(kind = err.kind().as_str(), error = %err, "Token rejected");
            }
        }

        result
    }

    /// Decode a token without verifying its signature.
    ///
    /// For diagnostics only; never authorize on the result.
    ///
    /// # Errors
    /// * `MalformedToken` - Undecodable token, or no subject or audience
    pub fn inspect(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = token::parse(token)?.claims;

        if claims.subject().is_none() {
            return Err(TokenError::MalformedToken(
                "Token does not contain subject".to_string(),
            ));
        }
        if claims.aud.as_deref().map_or(true, str::is_empty) {
            return Err(TokenError::MalformedToken(
                "Token does not contain audience".to_string(),
            ));
        }

        Ok(claims)
    }

    fn resolve(&self) -> Result<(&dyn SigningBackend, &KeyMaterial, &str), TokenError> {
        let algorithm = self.config.signing_algorithm()?;
        let audience = self.config.required_audience()?;
        let backend = self.registry.select(algorithm)?;
        let key = self.key.get_or_derive(backend, &self.config)?;
        Ok((backend, key, audience))
    }

    fn run(&self, token: &str) -> ValidationResult {
        let (backend, key, audience) = self.resolve()?;

        let parsed = token::parse(token)?;
        if parsed.header.alg != backend.algorithm().jwt_algorithm() {
            tracing::debug!(
                declared = ?parsed.header.alg,
                configured = %backend.algorithm(),
                "Token declares a different algorithm"
            );
        }

        let claims = backend.verify(token, key)?;

        let violations = self.claim_violations(&claims, audience);
        for violation in &violations {
            tracing::debug!(kind = violation.kind().as_str(), "Claim policy violation");
        }
        if let Some(first) = violations.into_iter().next() {
            return Err(first);
        }

        let subject = claims.subject().unwrap_or_default().to_string();
        Ok(Principal::new(subject, claims))
    }

    fn claim_violations(&self, claims: &Claims, audience: &str) -> Vec<TokenError> {
        let now = self.clock.now().timestamp();
        let skew = self.config.clock_skew();
        let mut violations = Vec::new();

        match claims.exp {
            None => violations.push(TokenError::missing_claim("exp")),
            Some(_) if claims.is_expired(now.saturating_sub(skew)) => {
                violations.push(TokenError::TokenExpired)
            }
            Some(_) => {}
        }

        match claims.nbf {
            None => violations.push(TokenError::missing_claim("nbf")),
            Some(_) if claims.is_not_yet_valid(now.saturating_add(skew)) => {
                violations.push(TokenError::InvalidSignature)
            }
            Some(_) => {}
        }

        if claims.iat.is_none() {
            violations.push(TokenError::missing_claim("iat"));
        }

        if claims.aud.as_deref() != Some(audience) {
            violations.push(TokenError::InvalidAudience(
                claims.aud.clone().unwrap_or_default(),
            ));
        }

        if let Some(expected) = self.config.issuer() {
            if claims.iss.as_deref() != Some(expected) {
                violations.push(TokenError::InvalidIssuer(
                    claims.iss.clone().unwrap_or_default(),
                ));
            }
        }

        if claims.subject().is_none() {
            violations.push(TokenError::missing_claim("sub"));
        }

        violations
    }
}
