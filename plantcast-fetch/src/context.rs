//! Fetch context wiring the API client, token manager and fetcher.
//!
//! The context is built once per process from [`FetchSettings`] and hands
//! out fetchers and token managers that share one HTTP client.

use std::sync::Arc;
use std::time::Duration;

use plantcast_core::MAX_PLANTS_PER_REQUEST;
use tracing::debug;

use crate::api::{DEFAULT_BASE_URL, Endpoints, OnsApi, OnsClient};
use crate::auth::TokenManager;
use crate::error::FetchError;
use crate::forecast::BatchForecastFetcher;
use crate::host::http::{DEFAULT_TIMEOUT_SECS, HttpClient};
use crate::retry::{RateLimitPolicy, Sleeper, TokioSleeper};

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// API base URL; endpoint paths are resolved against it.
    pub base_url: String,
    /// Timeout for each HTTP request.
    pub timeout: Duration,
    /// Plants per forecast request.
    pub batch_size: usize,
    /// Behavior on 429.
    pub rate_limit: RateLimitPolicy,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            batch_size: MAX_PLANTS_PER_REQUEST,
            rate_limit: RateLimitPolicy::default(),
        }
    }
}

impl FetchSettings {
    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the number of plants per forecast request.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the rate-limit policy.
    pub fn with_rate_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit = policy;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Shared handles for talking to the API.
pub struct FetchContext {
    api: Arc<dyn OnsApi>,
    sleeper: Arc<dyn Sleeper>,
    settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context backed by a real HTTP client.
    ///
    /// The client only talks to the host of `settings.base_url`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the base URL is invalid or the client
    /// cannot be built.
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        Self::builder().settings(settings).build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns a token manager over the shared API.
    pub fn token_manager(&self) -> TokenManager {
        TokenManager::new(Arc::clone(&self.api))
    }

    /// Returns a fetcher configured from the settings.
    pub fn fetcher(&self) -> BatchForecastFetcher {
        BatchForecastFetcher::new(Arc::clone(&self.api))
            .with_sleeper(Arc::clone(&self.sleeper))
            .with_policy(self.settings.rate_limit.clone())
            .with_batch_size(self.settings.batch_size)
    }

    /// Returns the settings this context was built with.
    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
pub struct FetchContextBuilder {
    api: Option<Arc<dyn OnsApi>>,
    sleeper: Option<Arc<dyn Sleeper>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            api: None,
            sleeper: None,
            settings: FetchSettings::default(),
        }
    }

    /// Sets the API implementation.
    pub fn api(mut self, api: Arc<dyn OnsApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Sets the sleeper used for cooldowns.
    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds the fetch context.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if no API was supplied and the default
    /// client cannot be built from the settings.
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let api = match self.api {
            Some(api) => api,
            None => {
                let endpoints = Endpoints::from_base(&self.settings.base_url)?;
                debug!(host = endpoints.host(), "Building API client");
                let http = HttpClient::with_timeout(self.settings.timeout)?
                    .with_allowed_domains(vec![endpoints.host().to_string()]);
                Arc::new(OnsClient::new(http, endpoints)) as Arc<dyn OnsApi>
            }
        };

        Ok(FetchContext {
            api,
            sleeper: self.sleeper.unwrap_or_else(|| Arc::new(TokioSleeper)),
            settings: self.settings,
        })
    }
}

impl Default for FetchContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
