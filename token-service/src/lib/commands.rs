use std::collections::BTreeMap;

use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use token_auth::TokenError;
use token_auth::TokenErrorKind;
use token_auth::TokenService;

/// Issue and validate signed bearer tokens.
#[derive(Debug, Parser)]
#[command(name = "token-service", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Issue a token for an authenticated subject
    Issue {
        /// Subject identity, typically an email or user id
        subject: String,

        /// Additional claim as KEY=VALUE; VALUE is parsed as JSON when possible
        #[arg(long = "claim", value_parser = parse_claim)]
        claims: Vec<(String, serde_json::Value)>,
    },
    /// Validate a token and print the authenticated principal
    Validate { token: String },
    /// Print a token's claims without verifying its signature
    Inspect { token: String },
}

/// Machine-readable failure printed on stdout.
#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorOutput {
    pub error: &'static str,
    pub message: String,
}

impl From<&TokenError> for ErrorOutput {
    fn from(err: &TokenError) -> Self {
        Self {
            error: err.kind().as_str(),
            message: err.to_string(),
        }
    }
}

/// Process exit code for a failure, following sysexits.h.
pub fn exit_code(err: &TokenError) -> u8 {
    match err.kind() {
        TokenErrorKind::Configuration | TokenErrorKind::UnsupportedAlgorithm => 78,
        TokenErrorKind::MalformedToken => 65,
        TokenErrorKind::InvalidSignature
        | TokenErrorKind::TokenExpired
        | TokenErrorKind::InvalidAudience
        | TokenErrorKind::InvalidIssuer => 77,
        TokenErrorKind::EncodingFailed => 70,
    }
}

/// Parse a `KEY=VALUE` claim argument.
pub fn parse_claim(arg: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("invalid claim '{}': expected KEY=VALUE", arg))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid claim '{}': empty key", arg));
    }

    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    Ok((key.to_string(), value))
}

/// Execute one command against a started service.
///
/// # Errors
/// Whatever the underlying token operation reports.
pub fn run(service: &TokenService, command: &Command) -> Result<serde_json::Value, TokenError> {
    let output = match command {
        Command::Issue { subject, claims } => {
            let extra: BTreeMap<String, serde_json::Value> = claims.iter().cloned().collect();
            let issued = service.generate_with_claims(subject, extra)?;
            tracing::info!(subject = %subject, expires_at = %issued.expires_at, "Token issued");
            serde_json::to_value(issued)
        }
        Command::Validate { token } => {
            let principal = service.validate(token)?;
            tracing::info!(subject = %principal.subject(), "Token valid");
            serde_json::to_value(principal)
        }
        Command::Inspect { token } => serde_json::to_value(service.inspect(token)?),
    };

    output.map_err(|e| TokenError::EncodingFailed(e.to_string()))
}
