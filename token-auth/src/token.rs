//! Structural parsing of the compact `header.payload.signature` encoding.
//!
//! Nothing here checks the signature; see [`crate::backend::SigningBackend::verify`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::Header;
use serde::de::DeserializeOwned;

use crate::claims::Claims;
use crate::errors::TokenError;

/// A token whose segments decode, but whose signature is not yet verified.
#[derive(Debug, Clone)]
pub struct ParsedToken {
    pub header: Header,
    pub claims: Claims,
}

/// Split and decode the three segments of a compact token.
///
/// # Errors
/// * `MalformedToken` - Wrong segment count, bad base64url, or bad JSON
pub fn parse(token: &str) -> Result<ParsedToken, TokenError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::MalformedToken(
            "Token must have 3 parts separated by dots".to_string(),
        ));
    }

    let header: Header = decode_segment(parts[0], "header")?;
    let claims: Claims = decode_segment(parts[1], "payload")?;

    if parts[2].is_empty() {
        return Err(TokenError::MalformedToken("Token is not signed".to_string()));
    }
    URL_SAFE_NO_PAD.decode(parts[2]).map_err(|e| {
        TokenError::MalformedToken(format!("Failed to decode token signature: {}", e))
    })?;

    Ok(ParsedToken { header, claims })
}

fn decode_segment<T: DeserializeOwned>(segment: &str, name: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
        TokenError::MalformedToken(format!("Failed to decode token {}: {}", name, e))
    })?;

    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::MalformedToken(format!("Failed to parse token {}: {}", name, e)))
}
