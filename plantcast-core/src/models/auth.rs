//! Authentication types.
//!
//! Neither type is ever written to disk. Both redact their secrets in
//! `Debug` output so they can flow through `tracing` fields safely.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Credentials
// ============================================================================

/// Login and password supplied by the user.
///
/// Serializes to the authentication endpoint's body shape
/// (`{"usuario": .., "senha": ..}`).
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account login.
    #[serde(rename = "usuario")]
    pub login: String,
    /// Account password.
    #[serde(rename = "senha")]
    pub password: String,
}

impl Credentials {
    /// Creates credentials from a login and password.
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Token Pair
// ============================================================================

/// Access/refresh token pair issued by the API.
///
/// The access token expires on a server-defined schedule that is not
/// observable client-side; expiry shows up as a 401 on a forecast request.
/// A pair is always replaced as a whole on renewal.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Bearer token for forecast requests.
    pub access_token: String,
    /// Token exchanged for a fresh pair.
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a token pair.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Returns true if both tokens are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}
