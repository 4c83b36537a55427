//! Algorithm-family signing backends.
//!
//! Every family shares the [`SigningBackend`] contract; they differ only in how
//! key material is derived from [`SecurityConfig`].

pub mod ecdsa;
pub mod hmac;
pub mod rsa;

use std::fmt;

use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

pub use ecdsa::EcdsaBackend;
pub use hmac::HmacBackend;
pub use rsa::RsaBackend;

use crate::algorithm::AlgorithmFamily;
use crate::algorithm::SigningAlgorithm;
use crate::claims::Claims;
use crate::config::SecurityConfig;
use crate::errors::TokenError;

/// Key material derived from configuration.
///
/// Verify-only deployments of asymmetric algorithms carry no encoding key.
#[derive(Clone)]
pub struct KeyMaterial {
    encoding: Option<EncodingKey>,
    decoding: DecodingKey,
}

impl KeyMaterial {
    pub fn new(encoding: Option<EncodingKey>, decoding: DecodingKey) -> Self {
        Self { encoding, decoding }
    }

    pub fn can_sign(&self) -> bool {
        self.encoding.is_some()
    }

    fn encoding_key(&self) -> Result<&EncodingKey, TokenError> {
        self.encoding.as_ref().ok_or_else(|| {
            TokenError::Configuration("No signing_key configured; deployment is verify-only".into())
        })
    }

    fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("can_sign", &self.can_sign())
            .finish_non_exhaustive()
    }
}

/// Signs and verifies compact tokens for one algorithm identifier.
pub trait SigningBackend: Send + Sync + 'static {
    /// Identifier this backend is registered under.
    fn algorithm(&self) -> SigningAlgorithm;

    /// Derive key material from configuration.
    ///
    /// Deterministic for a given configuration, so callers may cache the result.
    ///
    /// # Errors
    /// * `Configuration` - Required key is missing, empty, or unparseable
    fn derive_key(&self, config: &SecurityConfig) -> Result<KeyMaterial, TokenError>;

    /// Serialize claims into a signed compact token.
    ///
    /// # Errors
    /// * `Configuration` - Key material cannot sign (verify-only, or the key
    ///   does not fit the algorithm)
    /// * `EncodingFailed` - Claims could not be serialized or signed
    fn sign(&self, claims: &Claims, key: &KeyMaterial) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm().jwt_algorithm());

        encode(&header, claims, key.encoding_key()?).map_err(TokenError::signing_failed)
    }

    /// Verify the signature of a compact token and return its claims.
    ///
    /// Only the signature is checked here (constant-time comparison for HMAC);
    /// time, audience and issuer policy belong to the validator. A header that
    /// names any other algorithm than [`SigningBackend::algorithm`] is rejected.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature mismatch or algorithm substitution
    /// * `MalformedToken` - Token cannot be decoded
    fn verify(&self, token: &str, key: &KeyMaterial) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm().jwt_algorithm());
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        let token_data = decode::<Claims>(token, key.decoding_key(), &validation)?;

        Ok(token_data.claims)
    }
}

pub(crate) fn check_family(
    algorithm: SigningAlgorithm,
    expected: AlgorithmFamily,
) -> Result<SigningAlgorithm, TokenError> {
    if algorithm.family() != expected {
        return Err(TokenError::UnsupportedAlgorithm(format!(
            "{} is not a {:?} algorithm",
            algorithm, expected
        )));
    }
    Ok(algorithm)
}

/// PEM-based key material shared by the asymmetric families.
///
/// The public key is mandatory; the private key is optional.
pub(crate) fn pem_key_material(
    config: &SecurityConfig,
    encoding_from_pem: fn(&[u8]) -> jsonwebtoken::errors::Result<EncodingKey>,
    decoding_from_pem: fn(&[u8]) -> jsonwebtoken::errors::Result<DecodingKey>,
) -> Result<KeyMaterial, TokenError> {
    let public_pem = config.verification_key().ok_or_else(|| {
        TokenError::Configuration("Setting verification_key is null or empty".to_string())
    })?;

    let decoding = decoding_from_pem(public_pem.as_bytes())
        .map_err(|e| TokenError::Configuration(format!("Invalid verification_key: {}", e)))?;

    let encoding = config
        .signing_key()
        .map(|pem| encoding_from_pem(pem.as_bytes()))
        .transpose()
        .map_err(|e| TokenError::Configuration(format!("Invalid signing_key: {}", e)))?;

    Ok(KeyMaterial::new(encoding, decoding))
}

/// Sign a throwaway claim set and verify it with the same key material.
///
/// Catches keys that parse but do not fit the algorithm (wrong curve, a public
/// PEM as `signing_key`, a private key from another pair). Verify-only
/// material is accepted as is.
pub(crate) fn check_key_pair(
    backend: &dyn SigningBackend,
    key: &KeyMaterial,
) -> Result<(), TokenError> {
    if !key.can_sign() {
        return Ok(());
    }

    let claims = Claims::new().with_subject("key-check");
    let token = backend.sign(&claims, key)?;

    backend.verify(&token, key).map(|_| ()).map_err(|e| {
        TokenError::Configuration(format!(
            "signing_key and verification_key do not form a {} key pair: {}",
            backend.algorithm(),
            e
        ))
    })
}

/// Key material derived at most once per owner.
///
/// The first successful derivation is kept for the life of the owner; a failed
/// one is not cached, so it is reported again on the next call. Signing keys
/// are checked against the verification key before they are kept.
#[derive(Default)]
pub(crate) struct KeyCache(once_cell::sync::OnceCell<KeyMaterial>);

impl KeyCache {
    pub(crate) fn get_or_derive(
        &self,
        backend: &dyn SigningBackend,
        config: &SecurityConfig,
    ) -> Result<&KeyMaterial, TokenError> {
        self.0.get_or_try_init(|| {
            let key = backend.derive_key(config)?;
            check_key_pair(backend, &key)?;
            Ok(key)
        })
    }
}
