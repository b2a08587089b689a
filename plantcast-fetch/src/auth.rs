//! Token management: credential login and token renewal.

use std::sync::Arc;

use plantcast_core::{Credentials, TokenPair};
use tracing::{info, instrument, warn};

use crate::api::OnsApi;
use crate::error::AuthError;

/// Exchanges credentials or refresh tokens for token pairs.
///
/// Neither operation retries: a rejected login or renewal is final and the
/// caller decides what to do next.
#[derive(Clone)]
pub struct TokenManager {
    api: Arc<dyn OnsApi>,
}

impl TokenManager {
    /// Creates a token manager over `api`.
    pub fn new(api: Arc<dyn OnsApi>) -> Self {
        Self { api }
    }

    /// Logs in with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` with the HTTP status on any non-200
    /// response, or a transport/parse error.
    #[instrument(skip(self, credentials), fields(login = %credentials.login))]
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<TokenPair, AuthError> {
        match self.api.authenticate(credentials).await {
            Ok(tokens) => {
                info!("Authenticated");
                Ok(tokens)
            }
            Err(e) => {
                warn!(error = %e, "Authentication failed");
                Err(e)
            }
        }
    }

    /// Exchanges `refresh_token` for a new pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::RenewalRejected` with the HTTP status on any
    /// non-200 response, or a transport/parse error.
    #[instrument(skip(self, refresh_token))]
    pub async fn renew(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        match self.api.renew(refresh_token).await {
            Ok(tokens) => {
                info!("Token renewed");
                Ok(tokens)
            }
            Err(e) => {
                warn!(error = %e, "Token renewal failed");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager").finish_non_exhaustive()
    }
}
