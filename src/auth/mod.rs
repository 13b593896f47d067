//! Request authentication gate.
//!
//! Two paths, chosen per request: a dual-token session (access + refresh
//! cookies, both must verify) and a shared-secret path for trusted internal
//! services. The gate attaches an [`Identity`] on success and rejects with
//! 401 otherwise.

mod cookie;
mod credentials;
mod errors;
mod extractors;
mod gate;
mod service;
mod session;
mod state;
mod types;

pub use cookie::{ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME, get_cookie};
pub use credentials::{CredentialPair, header_token};
pub use errors::{AuthErrorKind, AuthRejection, IdentityRejection};
pub use extractors::{Authenticated, CurrentUser, InternalService};
pub use gate::{AuthPath, Gate, require_auth};
pub use service::{
    DEFAULT_AUTH_SCHEME, DEFAULT_SIGNAL_HEADER, DEFAULT_TOKEN_HEADER, ServiceAuthenticator,
    ServiceStrategy,
};
pub use session::authenticate_session;
pub use state::{GateConfig, HasGate};
pub use types::{Identity, UserSession};
