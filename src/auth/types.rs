//! Identities attached to a request once it passes the gate.

use serde::Serialize;

use crate::jwt::Claims;

/// A user session proven by a valid access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSession {
    user: Claims,
    refresh_token: Claims,
}

impl UserSession {
    pub(crate) fn new(user: Claims, refresh_token: Claims) -> Self {
        Self {
            user,
            refresh_token,
        }
    }

    /// Claims from the access token
    pub fn user(&self) -> &Claims {
        &self.user
    }

    /// Claims from the refresh token, kept for downstream rotation
    pub fn refresh_token(&self) -> &Claims {
        &self.refresh_token
    }
}

/// The identity the gate attaches to the request extensions.
///
/// Only the gate constructs one, and it is inserted exactly once per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    User(UserSession),
    /// Trusted internal caller; carries no per-caller claims
    InternalService,
}

impl Identity {
    pub fn as_user(&self) -> Option<&UserSession> {
        match self {
            Identity::User(session) => Some(session),
            Identity::InternalService => None,
        }
    }

    pub fn is_internal_service(&self) -> bool {
        matches!(self, Identity::InternalService)
    }
}
