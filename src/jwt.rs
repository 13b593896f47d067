//! JWT verification for the dual-token session path.
//!
//! Verification never panics and never throws: every token either decodes to
//! [`Claims`] or yields a [`VerifyError`] naming why it was rejected.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::secrets::{Secret, Secrets};

/// Which configured secret a token is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretName {
    AccessToken,
    RefreshToken,
}

impl SecretName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretName::AccessToken => "access_token",
            SecretName::RefreshToken => "refresh_token",
        }
    }
}

/// Decoded payload of a verified token.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Principal identifier, taken from `id` and falling back to `sub`.
    pub fn principal(&self) -> Option<String> {
        ["id", "sub"]
            .iter()
            .filter_map(|name| self.0.get(*name))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Reasons a token fails verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// `exp` is in the past, or `nbf` is still in the future
    Expired,
    /// Not a well-formed HMAC-signed JWT with an object payload
    Malformed,
    /// Signature does not match the bound secret
    SignatureMismatch,
    /// No secret is bound to the requested name
    SecretUnconfigured,
}

impl VerifyError {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyError::Expired => "expired",
            VerifyError::Malformed => "malformed",
            VerifyError::SignatureMismatch => "signature-mismatch",
            VerifyError::SecretUnconfigured => "secret-unconfigured",
        }
    }
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyError::Expired => write!(f, "Token has expired"),
            VerifyError::Malformed => write!(f, "Token is malformed"),
            VerifyError::SignatureMismatch => write!(f, "Token signature does not match"),
            VerifyError::SecretUnconfigured => write!(f, "No secret configured for token"),
        }
    }
}

impl std::error::Error for VerifyError {}

/// Verifies a single token against a named secret.
///
/// Implementations must be pure: the same token, secret and clock reading
/// always give the same result.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str, secret: SecretName) -> Result<Claims, VerifyError>;
}

/// HMAC JWT verifier holding one decoding key per configured secret.
#[derive(Clone)]
pub struct JwtVerifier {
    access_key: Option<DecodingKey>,
    refresh_key: Option<DecodingKey>,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secrets: &Secrets) -> Self {
        let key = |secret: &Option<Secret>| {
            secret
                .as_ref()
                .map(|s| DecodingKey::from_secret(s.expose().as_bytes()))
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            access_key: key(&secrets.access_token),
            refresh_key: key(&secrets.refresh_token),
            validation,
        }
    }

    /// Verify a token as of `now` (Unix seconds).
    pub fn verify_at(
        &self,
        token: &str,
        secret: SecretName,
        now: u64,
    ) -> Result<Claims, VerifyError> {
        let key = match secret {
            SecretName::AccessToken => self.access_key.as_ref(),
            SecretName::RefreshToken => self.refresh_key.as_ref(),
        }
        .ok_or(VerifyError::SecretUnconfigured)?;

        let token_data = jsonwebtoken::decode::<Claims>(token, key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => VerifyError::SignatureMismatch,
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                _ => VerifyError::Malformed,
            })?;

        check_time_window(&token_data.claims, now)?;

        Ok(token_data.claims)
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str, secret: SecretName) -> Result<Claims, VerifyError> {
        self.verify_at(token, secret, current_timestamp())
    }
}

/// A token is valid from `nbf` until just before `exp`. Either claim may be
/// absent; when present it must be a number.
fn check_time_window(claims: &Claims, now: u64) -> Result<(), VerifyError> {
    let now = now as f64;

    if let Some(nbf) = claims.get("nbf") {
        let nbf = nbf.as_f64().ok_or(VerifyError::Malformed)?;
        if nbf > now {
            return Err(VerifyError::Expired);
        }
    }

    if let Some(exp) = claims.get("exp") {
        let exp = exp.as_f64().ok_or(VerifyError::Malformed)?;
        if now >= exp {
            return Err(VerifyError::Expired);
        }
    }

    Ok(())
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
