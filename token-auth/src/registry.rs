use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::algorithm::AlgorithmFamily;
use crate::algorithm::SigningAlgorithm;
use crate::backend::EcdsaBackend;
use crate::backend::HmacBackend;
use crate::backend::RsaBackend;
use crate::backend::SigningBackend;
use crate::errors::TokenError;

/// Table of signing backends indexed by algorithm identifier.
///
/// Built once at startup through [`BackendRegistryBuilder`] and never mutated
/// afterwards, so it can be shared across threads behind an `Arc`.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: BTreeMap<SigningAlgorithm, Arc<dyn SigningBackend>>,
}

impl BackendRegistry {
    pub fn builder() -> BackendRegistryBuilder {
        BackendRegistryBuilder::default()
    }

    /// Registry with one backend for every recognized identifier.
    pub fn standard() -> Self {
        let mut backends: BTreeMap<SigningAlgorithm, Arc<dyn SigningBackend>> = BTreeMap::new();
        for algorithm in SigningAlgorithm::ALL {
            let backend: Arc<dyn SigningBackend> = match algorithm.family() {
                AlgorithmFamily::Hmac => Arc::new(HmacBackend { algorithm }),
                AlgorithmFamily::Rsa => Arc::new(RsaBackend { algorithm }),
                AlgorithmFamily::Ecdsa => Arc::new(EcdsaBackend { algorithm }),
            };
            backends.insert(algorithm, backend);
        }
        Self { backends }
    }

    /// Look up the backend registered for `algorithm`.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - No backend is registered for this identifier
    pub fn select(&self, algorithm: SigningAlgorithm) -> Result<&dyn SigningBackend, TokenError> {
        self.backends
            .get(&algorithm)
            .map(|backend| backend.as_ref())
            .ok_or_else(|| {
                TokenError::UnsupportedAlgorithm(format!(
                    "Service for type '{}' not found",
                    algorithm
                ))
            })
    }

    /// Parse `id` and look up its backend.
    ///
    /// # Errors
    /// * `Configuration` - `id` is not a recognized identifier
    /// * `UnsupportedAlgorithm` - No backend is registered for it
    pub fn select_by_id(&self, id: &str) -> Result<&dyn SigningBackend, TokenError> {
        self.select(id.parse()?)
    }

    pub fn algorithms(&self) -> impl Iterator<Item = SigningAlgorithm> + '_ {
        self.backends.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.backends.keys()).finish()
    }
}

/// Collects backends before the registry is frozen.
#[derive(Default)]
pub struct BackendRegistryBuilder {
    backends: BTreeMap<SigningAlgorithm, Arc<dyn SigningBackend>>,
}

impl BackendRegistryBuilder {
    /// Add a backend under the identifier it declares.
    ///
    /// # Errors
    /// * `Configuration` - A backend is already registered for that identifier
    pub fn register(mut self, backend: impl SigningBackend) -> Result<Self, TokenError> {
        let algorithm = backend.algorithm();
        if self.backends.contains_key(&algorithm) {
            return Err(TokenError::Configuration(format!(
                "A backend for '{}' is already registered",
                algorithm
            )));
        }
        self.backends.insert(algorithm, Arc::new(backend));
        Ok(self)
    }

    pub fn build(self) -> BackendRegistry {
        BackendRegistry {
            backends: self.backends,
        }
    }
}
