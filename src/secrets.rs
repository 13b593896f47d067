//! Process-wide secrets, loaded once at startup and never mutated.

use std::fmt;

/// An opaque secret value. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret value. Empty strings count as "not configured".
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

/// The three secrets the gate knows about. Any of them may be unbound.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    /// Signs access tokens
    pub access_token: Option<Secret>,
    /// Signs refresh tokens
    pub refresh_token: Option<Secret>,
    /// Shared with trusted internal callers
    pub service_token: Option<Secret>,
}
