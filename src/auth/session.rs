//! Session authentication: the access and refresh tokens must both verify.

use super::credentials::CredentialPair;
use super::errors::AuthErrorKind;
use super::types::UserSession;
use crate::jwt::{SecretName, TokenVerifier};

/// Authenticate a user session from its credential pair.
///
/// Steps run strictly in order and stop at the first failure:
/// 1. both cookies present, else `MissingTokens` (nothing is verified);
/// 2. access token verifies, else `InvalidAccessToken` (refresh is never checked);
/// 3. refresh token verifies, else `InvalidRefreshToken`.
pub fn authenticate_session<V>(
    verifier: &V,
    credentials: &CredentialPair<'_>,
) -> Result<UserSession, AuthErrorKind>
where
    V: TokenVerifier + ?Sized,
{
    let (Some(access_token), Some(refresh_token)) =
        (credentials.access_token, credentials.refresh_token)
    else {
        return Err(AuthErrorKind::MissingTokens);
    };

    let user = verifier
        .verify(access_token, SecretName::AccessToken)
        .map_err(AuthErrorKind::InvalidAccessToken)?;

    let refresh = verifier
        .verify(refresh_token, SecretName::RefreshToken)
        .map_err(AuthErrorKind::InvalidRefreshToken)?;

    Ok(UserSession::new(user, refresh))
}
