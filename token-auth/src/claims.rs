use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// Claim names the issuer owns. Caller-supplied claims never overwrite them.
pub const RESERVED_CLAIMS: [&str; 7] = ["sub", "email", "iat", "nbf", "exp", "aud", "iss"];

/// Identity-bearing claim set alongside `sub`.
pub const EMAIL_CLAIM: &str = "email";

/// Claim set carried by a token.
///
/// Standard RFC 7519 claims are typed fields; everything else (including
/// `email`) lives in `extra`, which is flattened into the payload in key order.
/// Fields are optional because a decoded token may lack any of them; the
/// validator decides which ones are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (identity the token asserts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Additional fields (flattened into token)
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Set not before (Unix timestamp).
    pub fn with_not_before(mut self, nbf: i64) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: impl ToString) -> Self {
        self.iss = Some(iss.to_string());
        self
    }

    /// Set audience.
    pub fn with_audience(mut self, aud: impl ToString) -> Self {
        self.aud = Some(aud.to_string());
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Get email from extra fields (convenience method).
    pub fn email(&self) -> Option<&str> {
        self.extra.get(EMAIL_CLAIM).and_then(|v| v.as_str())
    }

    /// Subject, treating an empty string as absent.
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.is_empty())
    }

    /// Check if token is expired. A token is still valid at exactly `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(false, |exp| exp < current_timestamp)
    }

    /// Check if token is not yet active.
    pub fn is_not_yet_valid(&self, current_timestamp: i64) -> bool {
        self.nbf.map_or(false, |nbf| current_timestamp < nbf)
    }
}

/// Whether `name` is one of the issuer-owned claim names.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_CLAIMS.contains(&name)
}

/// Authenticated identity produced by a successful validation.
///
/// The surrounding service maps this to its own user representation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Principal {
    subject: String,
    claims: Claims,
}

impl Principal {
    pub(crate) fn new(subject: String, claims: Claims) -> Self {
        Self { subject, claims }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }
}
