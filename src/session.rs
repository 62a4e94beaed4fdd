//! Typed accessors over the per-user session.
//!
//! The redirect slot is deliberately exposed as a take-operation only:
//! reading it removes it, which is what enforces the single-consumption
//! invariant of the post-login redirect.

use actix_session::{Session, SessionInsertError};
use tracing::warn;

/// Session key holding the validated post-login redirect target.
pub const NEXT_URL_KEY: &str = "next_url";

/// Session key holding the authenticated username. Written by the external
/// authentication flow once the provider handshake completes; only read here.
pub const AUTH_USER_KEY: &str = "auth_user";

/// Atomically consume the stored redirect target, if any.
pub fn take_next_url(session: &Session) -> Option<String> {
    match session.remove_as::<String>(NEXT_URL_KEY) {
        Some(Ok(url)) => Some(url),
        Some(Err(raw)) => {
            warn!(value = %raw, "discarding non-string redirect slot value");
            None
        }
        None => None,
    }
}

/// Store a validated redirect target for the next authenticated login.
pub fn store_next_url(session: &Session, url: &str) -> Result<(), SessionInsertError> {
    session.insert(NEXT_URL_KEY, url)
}

/// Username of the authenticated caller, if the session carries one.
pub fn authenticated_user(session: &Session) -> Option<String> {
    session.get::<String>(AUTH_USER_KEY).ok().flatten()
}
