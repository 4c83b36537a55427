use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::check_family;
use super::pem_key_material;
use super::KeyMaterial;
use super::SigningBackend;
use crate::algorithm::AlgorithmFamily;
use crate::algorithm::SigningAlgorithm;
use crate::config::SecurityConfig;
use crate::errors::TokenError;

/// RSA backend (RS256/384/512 and PS256/384/512).
///
/// `verification_key` holds the public key PEM, `signing_key` the private key PEM
/// (PKCS#1 or PKCS#8). Without a private key the backend can only verify.
#[derive(Debug, Clone, Copy)]
pub struct RsaBackend {
    pub(crate) algorithm: SigningAlgorithm,
}

impl RsaBackend {
    /// # Errors
    /// * `UnsupportedAlgorithm` - `algorithm` is not an RSA algorithm
    pub fn new(algorithm: SigningAlgorithm) -> Result<Self, TokenError> {
        let algorithm = check_family(algorithm, AlgorithmFamily::Rsa)?;
        Ok(Self { algorithm })
    }
}

impl SigningBackend for RsaBackend {
    fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    fn derive_key(&self, config: &SecurityConfig) -> Result<KeyMaterial, TokenError> {
        pem_key_material(config, EncodingKey::from_rsa_pem, DecodingKey::from_rsa_pem)
    }
}
