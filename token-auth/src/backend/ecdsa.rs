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

/// Elliptic curve backend (ES256 on P-256, ES384 on P-384).
///
/// The private key must be PKCS#8 PEM.
#[derive(Debug, Clone, Copy)]
pub struct EcdsaBackend {
    pub(crate) algorithm: SigningAlgorithm,
}

impl EcdsaBackend {
    /// # Errors
    /// * `UnsupportedAlgorithm` - `algorithm` is not an ECDSA algorithm
    pub fn new(algorithm: SigningAlgorithm) -> Result<Self, TokenError> {
        let algorithm = check_family(algorithm, AlgorithmFamily::Ecdsa)?;
        Ok(Self { algorithm })
    }
}

impl SigningBackend for EcdsaBackend {
    fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    fn derive_key(&self, config: &SecurityConfig) -> Result<KeyMaterial, TokenError> {
        pem_key_material(config, EncodingKey::from_ec_pem, DecodingKey::from_ec_pem)
    }
}
