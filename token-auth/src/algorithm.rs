use std::fmt;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use crate::errors::TokenError;

/// Signing algorithm identifiers recognized by this crate.
///
/// Each identifier belongs to exactly one [`AlgorithmFamily`], and the
/// registry holds at most one backend per identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SigningAlgorithm {
    HS256,
    HS384,
    HS512,
    RS256,
    RS384,
    RS512,
    PS256,
    PS384,
    PS512,
    ES256,
    ES384,
}

/// Key family an algorithm belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    /// Shared secret (HMAC).
    Hmac,
    /// RSA PKCS#1 v1.5 and PSS.
    Rsa,
    /// Elliptic curve (ECDSA).
    Ecdsa,
}

impl SigningAlgorithm {
    pub const ALL: [SigningAlgorithm; 11] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::PS256,
        Self::PS384,
        Self::PS512,
        Self::ES256,
        Self::ES384,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::PS256 => "PS256",
            Self::PS384 => "PS384",
            Self::PS512 => "PS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
        }
    }

    pub fn family(&self) -> AlgorithmFamily {
        match self {
            Self::HS256 | Self::HS384 | Self::HS512 => AlgorithmFamily::Hmac,
            Self::RS256
            | Self::RS384
            | Self::RS512
            | Self::PS256
            | Self::PS384
            | Self::PS512 => AlgorithmFamily::Rsa,
            Self::ES256 | Self::ES384 => AlgorithmFamily::Ecdsa,
        }
    }

    /// The `jsonwebtoken` algorithm this identifier signs with.
    pub fn jwt_algorithm(&self) -> Algorithm {
        match self {
            Self::HS256 => Algorithm::HS256,
            Self::HS384 => Algorithm::HS384,
            Self::HS512 => Algorithm::HS512,
            Self::RS256 => Algorithm::RS256,
            Self::RS384 => Algorithm::RS384,
            Self::RS512 => Algorithm::RS512,
            Self::PS256 => Algorithm::PS256,
            Self::PS384 => Algorithm::PS384,
            Self::PS512 => Algorithm::PS512,
            Self::ES256 => Algorithm::ES256,
            Self::ES384 => Algorithm::ES384,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = TokenError;

    /// Parse an identifier, ignoring ASCII case and surrounding whitespace.
    ///
    /// # Errors
    /// * `Configuration` - Identifier is not a recognized algorithm
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|alg| alg.as_str().eq_ignore_ascii_case(id))
            .ok_or_else(|| {
                TokenError::Configuration(format!("Invalid security type: '{}'", id))
            })
    }
}
