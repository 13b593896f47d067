//! Credential extraction. Reads candidate credentials without validating them.

use axum::http::{HeaderMap, HeaderName};

use super::cookie::{ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME, get_cookie};

/// Access and refresh tokens as found in the request cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CredentialPair<'a> {
    pub access_token: Option<&'a str>,
    pub refresh_token: Option<&'a str>,
}

impl<'a> CredentialPair<'a> {
    pub fn from_headers(headers: &'a HeaderMap) -> Self {
        Self {
            access_token: get_cookie(headers, ACCESS_COOKIE_NAME),
            refresh_token: get_cookie(headers, REFRESH_COOKIE_NAME),
        }
    }
}

/// Read a raw credential from a header, optionally stripping an auth scheme.
///
/// With `scheme` set, a value of the form `<scheme> <token>` yields `<token>`
/// (scheme compared case-insensitively). A value using any other scheme is
/// returned whole so that it is treated as present-but-wrong rather than
/// missing. Empty or non-ASCII values are absent.
pub fn header_token<'a>(
    headers: &'a HeaderMap,
    name: &HeaderName,
    scheme: Option<&str>,
) -> Option<&'a str> {
    let value = headers.get(name)?.to_str().ok()?.trim();
    if value.is_empty() {
        return None;
    }

    let Some(scheme) = scheme else {
        return Some(value);
    };

    match value.split_once(char::is_whitespace) {
        Some((prefix, token)) if prefix.eq_ignore_ascii_case(scheme) => {
            let token = token.trim();
            (!token.is_empty()).then_some(token)
        }
        None if value.eq_ignore_ascii_case(scheme) => None,
        _ => Some(value),
    }
}
