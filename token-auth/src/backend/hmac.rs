use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::check_family;
use super::KeyMaterial;
use super::SigningBackend;
use crate::algorithm::AlgorithmFamily;
use crate::algorithm::SigningAlgorithm;
use crate::config::SecurityConfig;
use crate::errors::TokenError;

/// Shared-secret backend (HS256, HS384, HS512).
///
/// The secret bytes of `signing_key` are used for both signing and verifying.
/// Use at least as many bytes as the hash output (32 for HS256).
#[derive(Debug, Clone, Copy)]
pub struct HmacBackend {
    pub(crate) algorithm: SigningAlgorithm,
}

impl HmacBackend {
    /// # Errors
    /// * `UnsupportedAlgorithm` - `algorithm` is not an HMAC algorithm
    pub fn new(algorithm: SigningAlgorithm) -> Result<Self, TokenError> {
        let algorithm = check_family(algorithm, AlgorithmFamily::Hmac)?;
        Ok(Self { algorithm })
    }
}

impl SigningBackend for HmacBackend {
    fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    fn derive_key(&self, config: &SecurityConfig) -> Result<KeyMaterial, TokenError> {
        let secret = config.signing_key().ok_or_else(|| {
            TokenError::Configuration("Setting signing_key is null or empty".to_string())
        })?;

        Ok(KeyMaterial::new(
            Some(EncodingKey::from_secret(secret.as_bytes())),
            DecodingKey::from_secret(secret.as_bytes()),
        ))
    }
}
