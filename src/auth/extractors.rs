//! Axum extractors that read the identity attached by the gate.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::errors::IdentityRejection;
use super::types::{Identity, UserSession};

fn attached_identity(parts: &Parts) -> Result<&Identity, IdentityRejection> {
    parts
        .extensions
        .get::<Identity>()
        .ok_or(IdentityRejection::NotAuthenticated)
}

/// Any authenticated caller, user or internal service.
pub struct Authenticated(pub Identity);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        attached_identity(parts).cloned().map(Authenticated)
    }
}

/// A user session. Internal-service callers get 403.
pub struct CurrentUser(pub UserSession);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        attached_identity(parts)?
            .as_user()
            .cloned()
            .map(CurrentUser)
            .ok_or(IdentityRejection::UserOnly)
    }
}

/// An internal-service caller. User sessions get 403.
pub struct InternalService;

impl<S> FromRequestParts<S> for InternalService
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if attached_identity(parts)?.is_internal_service() {
            Ok(InternalService)
        } else {
            Err(IdentityRejection::ServiceOnly)
        }
    }
}
