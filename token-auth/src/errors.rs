use thiserror::Error;

/// Error type for token issuance and validation.
///
/// One variant per failure kind so callers can branch on it
/// (e.g. 401 vs 403 vs 500 at an HTTP boundary).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid audience: {0}")]
    InvalidAudience(String),

    #[error("Invalid issuer: {0}")]
    InvalidIssuer(String),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),
}

/// Fieldless discriminant of [`TokenError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenErrorKind {
    Configuration,
    UnsupportedAlgorithm,
    MalformedToken,
    InvalidSignature,
    TokenExpired,
    InvalidAudience,
    InvalidIssuer,
    EncodingFailed,
}

impl TokenErrorKind {
    /// Stable snake_case label, used in logs and machine-readable output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration_error",
            Self::UnsupportedAlgorithm => "unsupported_algorithm",
            Self::MalformedToken => "malformed_token",
            Self::InvalidSignature => "invalid_signature",
            Self::TokenExpired => "token_expired",
            Self::InvalidAudience => "invalid_audience",
            Self::InvalidIssuer => "invalid_issuer",
            Self::EncodingFailed => "encoding_failed",
        }
    }
}

impl TokenError {
    pub fn kind(&self) -> TokenErrorKind {
        match self {
            Self::Configuration(_) => TokenErrorKind::Configuration,
            Self::UnsupportedAlgorithm(_) => TokenErrorKind::UnsupportedAlgorithm,
            Self::MalformedToken(_) => TokenErrorKind::MalformedToken,
            Self::InvalidSignature => TokenErrorKind::InvalidSignature,
            Self::TokenExpired => TokenErrorKind::TokenExpired,
            Self::InvalidAudience(_) => TokenErrorKind::InvalidAudience,
            Self::InvalidIssuer(_) => TokenErrorKind::InvalidIssuer,
            Self::EncodingFailed(_) => TokenErrorKind::EncodingFailed,
        }
    }

    /// True for problems with the deployment rather than with a token.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::UnsupportedAlgorithm(_)
        )
    }

    pub(crate) fn missing_claim(name: &str) -> Self {
        Self::MalformedToken(format!("Missing required claim: {}", name))
    }

    /// Classify an error raised while signing.
    ///
    /// Key errors surface as `Configuration`; everything else (claim
    /// serialization, crypto failures) is `EncodingFailed`.
    pub(crate) fn signing_failed(err: jsonwebtoken::errors::Error) -> Self {
        match Self::from(err) {
            err @ Self::Configuration(_) => err,
            other => Self::EncodingFailed(other.detail()),
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Configuration(msg)
            | Self::UnsupportedAlgorithm(msg)
            | Self::MalformedToken(msg)
            | Self::InvalidAudience(msg)
            | Self::InvalidIssuer(msg)
            | Self::EncodingFailed(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            // A token whose header names another algorithm than the configured
            // one is treated as forged.
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            ErrorKind::ExpiredSignature => TokenError::TokenExpired,
            ErrorKind::ImmatureSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAudience => TokenError::InvalidAudience(String::new()),
            ErrorKind::InvalidIssuer => TokenError::InvalidIssuer(String::new()),
            ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidAlgorithmName => TokenError::Configuration(err.to_string()),
            ErrorKind::MissingRequiredClaim(claim) => TokenError::missing_claim(claim),
            _ => TokenError::MalformedToken(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            TokenError::InvalidAudience("aud1".into()).to_string(),
            "Invalid audience: aud1"
        );
        assert_eq!(TokenError::TokenExpired.to_string(), "Token expired");
        assert_eq!(
            TokenError::missing_claim("sub").to_string(),
            "Malformed token: Missing required claim: sub"
        );
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(TokenError::InvalidSignature.kind().as_str(), "invalid_signature");
        assert_eq!(
            TokenError::Configuration("x".into()).kind(),
            TokenErrorKind::Configuration
        );
        assert!(TokenError::UnsupportedAlgorithm("ES512".into()).is_configuration());
        assert!(!TokenError::TokenExpired.is_configuration());
    }

    #[test]
    fn test_error_from_jsonwebtoken() {
        use jsonwebtoken::errors::ErrorKind;

        let err: TokenError = jsonwebtoken::errors::Error::from(ErrorKind::InvalidSignature).into();
        assert_eq!(err, TokenError::InvalidSignature);

        let err: TokenError = jsonwebtoken::errors::Error::from(ErrorKind::InvalidAlgorithm).into();
        assert_eq!(err, TokenError::InvalidSignature);

        let err: TokenError = jsonwebtoken::errors::Error::from(ErrorKind::InvalidToken).into();
        assert!(matches!(err, TokenError::MalformedToken(_)));

        let err: TokenError = jsonwebtoken::errors::Error::from(ErrorKind::InvalidKeyFormat).into();
        assert!(matches!(err, TokenError::Configuration(_)));
    }

    #[test]
    fn test_signing_failures() {
        use jsonwebtoken::errors::ErrorKind;

        let err = TokenError::signing_failed(ErrorKind::InvalidEcdsaKey.into());
        assert!(matches!(err, TokenError::Configuration(_)));

        let err = TokenError::signing_failed(ErrorKind::RsaFailedSigning.into());
        assert!(matches!(err, TokenError::EncodingFailed(_)));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TokenError::signing_failed(json.into());
        assert!(matches!(err, TokenError::EncodingFailed(_)));
    }
}
