// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Plantcast Fetch
//!
//! Authenticated, batched forecast fetching against the ONS Integra API.
//!
//! ## Host APIs
//!
//! - [`host::http`] - HTTP client with tracing and domain allowlist
//!
//! ## API & Auth
//!
//! - [`api::OnsApi`] - Trait over the three endpoints (auth, renew, forecast)
//! - [`api::OnsClient`] - `reqwest`-backed implementation
//! - [`auth::TokenManager`] - Credential login and token renewal
//! - [`session::Session`] - Token pair owned by the active session
//!
//! ## Fetching
//!
//! - [`forecast::BatchForecastFetcher`] - Splits plants into batches of at
//!   most 10, renews the token once on 401, and restarts after a cooldown
//!   on 429
//! - [`retry::RateLimitPolicy`] / [`retry::Sleeper`] - Cooldown policy and
//!   injectable clock
//! - [`context::FetchContext`] - Wires the pieces together from settings
//!
//! ## Example
//!
//! ```ignore
//! use plantcast_core::{Credentials, ForecastDay, default_catalog};
//! use plantcast_fetch::{FetchContext, FetchSettings, Session};
//!
//! let ctx = FetchContext::new(FetchSettings::default())?;
//! let tokens = ctx.token_manager().authenticate(&Credentials::new("user", "pass")).await?;
//! let mut session = Session::new(tokens);
//!
//! let today = chrono::Local::now().date_naive();
//! let forecast = ctx.fetcher().fetch(&mut session, today, &default_catalog()).await?;
//! ```

// Core modules
pub mod api;
pub mod auth;
pub mod context;
pub mod error;
pub mod forecast;
pub mod host;
pub mod retry;
pub mod session;

// Re-export key types at crate root

// Errors
pub use error::{AuthError, FetchError, HttpError};

// Host APIs
pub use host::http::HttpClient;

// API & auth
pub use api::{DEFAULT_BASE_URL, Endpoints, GenerationReply, OnsApi, OnsClient};
pub use auth::TokenManager;
pub use session::Session;

// Fetching
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use forecast::{BatchForecastFetcher, batches};
pub use retry::{RateLimitPolicy, Sleeper, TokioSleeper};
