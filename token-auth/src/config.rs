use std::fmt;

use chrono::Duration;
use serde::Deserialize;

use crate::algorithm::SigningAlgorithm;
use crate::errors::TokenError;

/// 100 days.
pub const DEFAULT_LIFETIME_HOURS: i64 = 2400;

/// Ten years.
pub const MAX_LIFETIME_HOURS: i64 = 87_600;

/// Process-wide security settings shared read-only by issuer and validator.
///
/// Loaded once at startup. Nothing in this crate mutates it.
#[derive(Clone, Deserialize)]
pub struct SecurityConfig {
    /// Algorithm identifier, e.g. `HS256` or `RS256`
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// HMAC secret, or private key PEM for asymmetric algorithms
    #[serde(default)]
    pub signing_key: Option<String>,

    /// Public key PEM (asymmetric algorithms only)
    #[serde(default)]
    pub verification_key: Option<String>,

    #[serde(default)]
    pub audience: Option<String>,

    #[serde(default)]
    pub issuer: Option<String>,

    #[serde(default = "default_lifetime_hours")]
    pub lifetime_hours: i64,

    /// Tolerance applied to `exp` and `nbf` checks
    #[serde(default)]
    pub clock_skew_seconds: u64,
}

fn default_algorithm() -> String {
    SigningAlgorithm::HS256.to_string()
}

fn default_lifetime_hours() -> i64 {
    DEFAULT_LIFETIME_HOURS
}

impl SecurityConfig {
    /// Create an HS256 configuration with the default lifetime.
    pub fn hmac(secret: impl Into<String>) -> Self {
        Self {
            algorithm: default_algorithm(),
            signing_key: Some(secret.into()),
            verification_key: None,
            audience: None,
            issuer: None,
            lifetime_hours: DEFAULT_LIFETIME_HOURS,
            clock_skew_seconds: 0,
        }
    }

    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    pub fn with_signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = Some(key.into());
        self
    }

    pub fn with_verification_key(mut self, key: impl Into<String>) -> Self {
        self.verification_key = Some(key.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_lifetime_hours(mut self, hours: i64) -> Self {
        self.lifetime_hours = hours;
        self
    }

    pub fn with_clock_skew_seconds(mut self, seconds: u64) -> Self {
        self.clock_skew_seconds = seconds;
        self
    }

    /// Parse the configured algorithm identifier.
    ///
    /// # Errors
    /// * `Configuration` - Identifier is not a recognized algorithm
    pub fn signing_algorithm(&self) -> Result<SigningAlgorithm, TokenError> {
        self.algorithm.parse()
    }

    /// Configured audience, treating an empty string as unset.
    pub fn audience(&self) -> Option<&str> {
        non_empty(self.audience.as_deref())
    }

    /// Configured issuer, treating an empty string as unset.
    pub fn issuer(&self) -> Option<&str> {
        non_empty(self.issuer.as_deref())
    }

    pub fn signing_key(&self) -> Option<&str> {
        non_empty(self.signing_key.as_deref())
    }

    pub fn verification_key(&self) -> Option<&str> {
        non_empty(self.verification_key.as_deref())
    }

    /// Token lifetime.
    ///
    /// # Errors
    /// * `Configuration` - Lifetime is not in `1..=MAX_LIFETIME_HOURS`
    pub fn lifetime(&self) -> Result<Duration, TokenError> {
        if !(1..=MAX_LIFETIME_HOURS).contains(&self.lifetime_hours) {
            return Err(TokenError::Configuration(format!(
                "Setting lifetime_hours must be between 1 and {}, got {}",
                MAX_LIFETIME_HOURS, self.lifetime_hours
            )));
        }
        Ok(Duration::hours(self.lifetime_hours))
    }

    pub fn clock_skew(&self) -> i64 {
        i64::try_from(self.clock_skew_seconds).unwrap_or(i64::MAX)
    }

    /// Audience required by validation.
    ///
    /// # Errors
    /// * `Configuration` - Audience is missing or empty
    pub fn required_audience(&self) -> Result<&str, TokenError> {
        self.audience().ok_or_else(|| {
            TokenError::Configuration("Setting audience is null or empty".to_string())
        })
    }

    /// Check the deployment invariants without touching key material.
    ///
    /// Run at startup so a broken deployment never serves traffic.
    ///
    /// # Errors
    /// * `Configuration` - Unknown algorithm, missing audience, or lifetime out of range
    pub fn validate(&self) -> Result<SigningAlgorithm, TokenError> {
        let algorithm = self.signing_algorithm()?;
        self.required_audience()?;
        self.lifetime()?;
        Ok(algorithm)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn redacted(value: &Option<String>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "<redacted>",
        Some(_) => "<empty>",
        None => "<unset>",
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("algorithm", &self.algorithm)
            .field("signing_key", &redacted(&self.signing_key))
            .field("verification_key", &redacted(&self.verification_key))
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("lifetime_hours", &self.lifetime_hours)
            .field("clock_skew_seconds", &self.clock_skew_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_json() {
        let config: SecurityConfig =
            serde_json::from_str(r#"{"signing_key":"secret","audience":"aud1"}"#).unwrap();

        assert_eq!(config.algorithm, "HS256");
        assert_eq!(config.lifetime_hours, DEFAULT_LIFETIME_HOURS);
        assert_eq!(config.lifetime(), Ok(Duration::days(100)));
        assert_eq!(config.clock_skew_seconds, 0);
        assert_eq!(config.issuer(), None);
    }

    #[test]
    fn test_validate_success() {
        let config = SecurityConfig::hmac("secret").with_audience("aud1");
        assert_eq!(config.validate(), Ok(SigningAlgorithm::HS256));
    }

    #[test]
    fn test_validate_requires_audience() {
        let config = SecurityConfig::hmac("secret").with_audience("  ");
        assert!(matches!(
            config.validate(),
            Err(TokenError::Configuration(msg)) if msg.contains("audience")
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_algorithm() {
        let config = SecurityConfig::hmac("secret")
            .with_audience("aud1")
            .with_algorithm("XS999");
        assert!(matches!(config.validate(), Err(TokenError::Configuration(_))));
    }

    #[test]
    fn test_validate_rejects_lifetime_out_of_range() {
        for hours in [0, -5, MAX_LIFETIME_HOURS + 1] {
            let config = SecurityConfig::hmac("secret")
                .with_audience("aud1")
                .with_lifetime_hours(hours);
            assert!(matches!(config.validate(), Err(TokenError::Configuration(_))));
        }
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = SecurityConfig::hmac("super-secret-value").with_verification_key("");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("<empty>"));
    }
}
