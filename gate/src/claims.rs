//! Unverified JWT payload inspection.
//!
//! The gate never holds the signing key; it only reads the payload segment to
//! learn when the token expires and which role it carries. Signature checks
//! stay with the backend that accepts the token.

use crate::error::{GateError, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::{Map, Value};

/// Prefix Spring-style backends put in front of granted authorities.
pub const AUTHORITY_PREFIX: &str = "ROLE_";

/// One way of reading a role out of a claims object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleClaim {
    /// A string claim holding the role directly (`"role": "ADMIN"`).
    Scalar(&'static str),
    /// First element of an array claim (`"roles": ["ADMIN", ...]`).
    FirstOf(&'static str),
    /// First element of an array claim with a literal prefix removed
    /// (`"authorities": ["ROLE_ADMIN"]`).
    FirstOfStripped {
        claim: &'static str,
        prefix: &'static str,
    },
}

/// Strategies tried in order; the first one that yields a value wins.
pub const DEFAULT_ROLE_CLAIMS: [RoleClaim; 3] = [
    RoleClaim::Scalar("role"),
    RoleClaim::FirstOf("roles"),
    RoleClaim::FirstOfStripped {
        claim: "authorities",
        prefix: AUTHORITY_PREFIX,
    },
];

impl RoleClaim {
    /// Apply this strategy to a claims object.
    pub fn extract(&self, claims: &Map<String, Value>) -> Option<String> {
        match self {
            RoleClaim::Scalar(name) => claims.get(*name).and_then(non_empty_str),
            RoleClaim::FirstOf(name) => first_element(claims, name),
            RoleClaim::FirstOfStripped { claim, prefix } => {
                let value = first_element(claims, claim)?;
                Some(value.strip_prefix(prefix).unwrap_or(&value).to_string())
            },
        }
    }
}

fn non_empty_str(value: &Value) -> Option<String> {
    value.as_str().filter(|s| !s.is_empty()).map(str::to_string)
}

fn first_element(claims: &Map<String, Value>, name: &str) -> Option<String> {
    claims.get(name)?.as_array()?.first().and_then(non_empty_str)
}

/// Walk `strategies` in order and return the first role found.
pub fn resolve_role(claims: &Map<String, Value>, strategies: &[RoleClaim]) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy.extract(claims))
}

/// Claims read from a token payload.
///
/// Recomputed on every gate evaluation; nothing here is cached.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    /// `exp` claim, epoch seconds.
    pub expires_at: i64,
    /// Role resolved through the strategy list used at decode time.
    pub role: Option<String>,
    /// Full payload, for claims the gate itself does not interpret.
    pub payload: Map<String, Value>,
}

impl TokenClaims {
    /// Decode the payload segment of `token` without verifying its signature,
    /// resolving the role through [`DEFAULT_ROLE_CLAIMS`].
    pub fn decode_unverified(token: &str) -> Result<Self> {
        Self::decode_with(token, &DEFAULT_ROLE_CLAIMS)
    }

    /// Same as [`TokenClaims::decode_unverified`] with caller-supplied role strategies.
    pub fn decode_with(token: &str, role_claims: &[RoleClaim]) -> Result<Self> {
        let payload = decode_payload(token)?;

        let expires_at = match payload.get("exp") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.floor() as i64))
                .ok_or_else(|| GateError::TokenUndecodable("'exp' is out of range".into()))?,
            Some(_) => {
                return Err(GateError::TokenUndecodable("'exp' is not a number".into()));
            },
            None => return Err(GateError::TokenUndecodable("Missing 'exp' claim".into())),
        };

        let role = resolve_role(&payload, role_claims);

        Ok(Self {
            expires_at,
            role,
            payload,
        })
    }

    /// Expiry in epoch milliseconds.
    pub fn expires_at_millis(&self) -> i64 {
        self.expires_at.saturating_mul(1000)
    }

    /// `true` once `now_millis` has reached the expiry instant.
    pub fn is_expired_at(&self, now_millis: i64) -> bool {
        now_millis >= self.expires_at_millis()
    }

    /// `sub` claim, if present.
    pub fn subject(&self) -> Option<&str> {
        self.payload.get("sub").and_then(Value::as_str)
    }
}

/// Base64url-decode the second segment of a JWT into a JSON object.
fn decode_payload(token: &str) -> Result<Map<String, Value>> {
    let parts: Vec<&str> = token.trim().splitn(3, '.').collect();
    if parts.len() < 3 {
        return Err(GateError::TokenUndecodable(
            "Invalid JWT format: less than 3 segments".into(),
        ));
    }

    // Some issuers pad their segments anyway.
    let segment = parts[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| GateError::TokenUndecodable(format!("Invalid JWT payload base64: {}", e)))?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(GateError::TokenUndecodable("JWT payload is not an object".into())),
        Err(e) => Err(GateError::TokenUndecodable(format!("Invalid JWT payload JSON: {}", e))),
    }
}
