//! Bearer token issuance and validation.
//!
//! Provides the token core for services that authenticate callers themselves
//! and need signed tokens asserting the caller's identity:
//! - Pluggable signing backends (HMAC, RSA, ECDSA) selected by algorithm id
//! - Standard claim construction (`sub`, `iat`, `nbf`, `exp`, `aud`, `iss`)
//! - A staged validation pipeline with a typed error per failure kind
//!
//! Account storage, password checks and transport are left to the caller.
//!
//! # Examples
//!
//! ## Issue and validate
//! ```
//! use token_auth::{SecurityConfig, TokenService};
//!
//! let config = SecurityConfig::hmac("secret_key_at_least_32_bytes_long!")
//!     .with_audience("my-app")
//!     .with_issuer("auth.example.com");
//! let service = TokenService::start(config).unwrap();
//!
//! let issued = service.generate("alice@example.com").unwrap();
//! let principal = service.validate(&issued.token).unwrap();
//! assert_eq!(principal.subject(), "alice@example.com");
//! ```
//!
//! ## Branching on the failure kind
//! ```
//! use token_auth::{SecurityConfig, TokenError, TokenService};
//!
//! let service = TokenService::new(
//!     SecurityConfig::hmac("secret_key_at_least_32_bytes_long!").with_audience("my-app"),
//! );
//!
//! match service.validate("not-a-token") {
//!     Err(TokenError::MalformedToken(_)) => {}
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

pub mod algorithm;
pub mod backend;
pub mod claims;
pub mod clock;
pub mod config;
pub mod errors;
pub mod issuer;
pub mod registry;
pub mod service;
pub mod token;
pub mod validator;

#[cfg(test)]
mod testutil;

// Re-export commonly used items
pub use algorithm::AlgorithmFamily;
pub use algorithm::SigningAlgorithm;
pub use backend::KeyMaterial;
pub use backend::SigningBackend;
pub use claims::Claims;
pub use claims::Principal;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use config::SecurityConfig;
pub use errors::TokenError;
pub use errors::TokenErrorKind;
pub use issuer::IssuedToken;
pub use issuer::TokenIssuer;
pub use registry::BackendRegistry;
pub use service::TokenService;
pub use validator::TokenValidator;
pub use validator::ValidationResult;
