//! Fetch error types.

use plantcast_core::CoreError;
use thiserror::Error;

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error (connect, timeout, TLS, body read).
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header value could not be encoded.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

// ============================================================================
// Auth Error
// ============================================================================

/// Error type for login and token renewal.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The authentication endpoint rejected the credentials.
    #[error("Authentication failed: HTTP {status}")]
    Rejected {
        /// HTTP status returned by the server.
        status: u16,
    },

    /// The renewal endpoint rejected the refresh token.
    #[error("Token renewal failed: HTTP {status}")]
    RenewalRejected {
        /// HTTP status returned by the server.
        status: u16,
    },

    /// A 200 response whose body did not carry a token pair.
    #[error("Invalid auth response: {0}")]
    InvalidResponse(String),

    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

impl AuthError {
    /// Returns the HTTP status for server rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status } | Self::RenewalRejected { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Http(HttpError::Request(err))
    }
}

// ============================================================================
// Fetch Error
// ============================================================================

/// Error type for forecast fetches.
///
/// Rate limiting is normally recovered internally and only shows up here
/// when a restart cap is configured and exhausted.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The access token expired and the refresh token was rejected.
    #[error("Session expired and token renewal failed (HTTP {status}); log in again")]
    AuthRequired {
        /// HTTP status returned by the renewal endpoint.
        status: u16,
    },

    /// The one retry after a successful renewal did not return 200.
    #[error("Batch {batch} failed after token renewal: HTTP {status}")]
    FailedAfterRenewal {
        /// 1-based batch number.
        batch: usize,
        /// HTTP status of the retry.
        status: u16,
    },

    /// A batch returned a status other than 200, 401 or 429.
    #[error("Batch {batch} failed: HTTP {status}")]
    UnexpectedStatus {
        /// 1-based batch number.
        batch: usize,
        /// HTTP status returned by the server.
        status: u16,
    },

    /// Rate limited with the restart cap exhausted.
    #[error("Rate limited; gave up after {restarts} restarts")]
    RateLimited {
        /// Restarts performed before giving up.
        restarts: u32,
    },

    /// The response body did not match the forecast schema.
    #[error("Schema mismatch: {0}")]
    Schema(String),

    /// Renewal failed for a reason other than rejection.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

impl FetchError {
    /// Returns true if the user has to log in again.
    ///
    /// A renewal that answered 200 without a usable token pair leaves the
    /// session as dead as a rejected one.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Self::AuthRequired { .. }
                | Self::Auth(AuthError::RenewalRejected { .. } | AuthError::InvalidResponse(_))
        )
    }

    /// Returns the HTTP status that ended the fetch, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthRequired { status }
            | Self::FailedAfterRenewal { status, .. }
            | Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Auth(e) => e.status(),
            _ => None,
        }
    }
}

impl From<CoreError> for FetchError {
    fn from(err: CoreError) -> Self {
        FetchError::Schema(err.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(HttpError::Request(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_login() {
        assert!(FetchError::AuthRequired { status: 401 }.requires_login());
        assert!(!FetchError::UnexpectedStatus { batch: 1, status: 500 }.requires_login());
        assert!(!FetchError::RateLimited { restarts: 3 }.requires_login());
        assert!(FetchError::Auth(AuthError::InvalidResponse("empty token".into())).requires_login());
    }

    #[test]
    fn test_status() {
        assert_eq!(
            FetchError::FailedAfterRenewal { batch: 2, status: 403 }.status(),
            Some(403)
        );
        assert_eq!(FetchError::Schema("x".into()).status(), None);
        assert_eq!(
            FetchError::Auth(AuthError::Rejected { status: 400 }).status(),
            Some(400)
        );
    }

    #[test]
    fn test_core_error_is_schema() {
        let err: FetchError = CoreError::DuplicatePlant("VLAB2".into()).into();
        assert!(matches!(err, FetchError::Schema(ref m) if m.contains("VLAB2")));
    }
}
