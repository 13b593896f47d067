//! Shared-secret authentication for trusted internal callers.
//!
//! Two header conventions are supported, chosen by configuration:
//! - `Authorization`: the presence of an `Authorization` header marks a service
//!   call, and `<scheme> <secret>` carries the secret.
//! - `SignalHeader`: a presence-only header (e.g. `internal-service`) marks a
//!   service call, and a second header (e.g. `x-auth-token`) carries the raw secret.

use axum::http::{HeaderMap, HeaderName, header};
use subtle::ConstantTimeEq;

use super::credentials::header_token;
use super::errors::AuthErrorKind;
use crate::secrets::Secret;

pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";
pub const DEFAULT_SIGNAL_HEADER: &str = "internal-service";
pub const DEFAULT_TOKEN_HEADER: &str = "x-auth-token";

/// How a service call is recognised and where its shared secret lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStrategy {
    Authorization { scheme: String },
    SignalHeader { signal: HeaderName, token: HeaderName },
}

impl Default for ServiceStrategy {
    fn default() -> Self {
        Self::SignalHeader {
            signal: HeaderName::from_static(DEFAULT_SIGNAL_HEADER),
            token: HeaderName::from_static(DEFAULT_TOKEN_HEADER),
        }
    }
}

impl ServiceStrategy {
    /// Whether the request asks for the service path. Presence is enough.
    pub fn is_service_call(&self, headers: &HeaderMap) -> bool {
        match self {
            ServiceStrategy::Authorization { .. } => headers.contains_key(header::AUTHORIZATION),
            ServiceStrategy::SignalHeader { signal, .. } => headers.contains_key(signal),
        }
    }

    /// The shared-secret credential, if the request carries one.
    pub fn credential<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        match self {
            ServiceStrategy::Authorization { scheme } => {
                header_token(headers, &header::AUTHORIZATION, Some(scheme))
            }
            ServiceStrategy::SignalHeader { token, .. } => header_token(headers, token, None),
        }
    }
}

/// Checks shared-secret credentials against the configured service secret.
#[derive(Debug, Clone)]
pub struct ServiceAuthenticator {
    strategy: ServiceStrategy,
    secret: Option<Secret>,
}

impl ServiceAuthenticator {
    pub fn new(strategy: ServiceStrategy, secret: Option<Secret>) -> Self {
        Self { strategy, secret }
    }

    pub fn strategy(&self) -> &ServiceStrategy {
        &self.strategy
    }

    pub fn is_service_call(&self, headers: &HeaderMap) -> bool {
        self.strategy.is_service_call(headers)
    }

    /// Validate a shared-secret credential.
    pub fn authenticate(&self, credential: Option<&str>) -> Result<(), AuthErrorKind> {
        let credential = credential.ok_or(AuthErrorKind::MissingServiceToken)?;
        let secret = self
            .secret
            .as_ref()
            .ok_or(AuthErrorKind::ServiceSecretUnconfigured)?;

        if constant_time_eq(credential, secret.expose()) {
            Ok(())
        } else {
            Err(AuthErrorKind::InvalidServiceToken)
        }
    }
}

/// Constant-time comparison of the provided credential with the secret.
fn constant_time_eq(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
