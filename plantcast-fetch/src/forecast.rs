//! Batched forecast fetching with token renewal and rate-limit restarts.
//!
//! One fetch covers one date and any number of plants. Plants are sent in
//! batches of at most [`MAX_PLANTS_PER_REQUEST`], strictly one after another.
//! Per batch:
//!
//! - **200**: records are appended to the merged result
//! - **401**: the token is renewed once and the same batch retried once
//! - **429**: the fetch waits out the cooldown and restarts from batch 1
//! - anything else aborts the fetch

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use plantcast_core::{
    ForecastRequest, GenerationResponse, MAX_PLANTS_PER_REQUEST, MergedForecast, PlantCode,
};
use tracing::{debug, info, instrument, warn};

use crate::api::{GenerationReply, OnsApi};
use crate::auth::TokenManager;
use crate::error::{AuthError, FetchError};
use crate::retry::{RateLimitPolicy, Sleeper, TokioSleeper};
use crate::session::Session;

/// Splits `plants` into consecutive batches of at most `size` plants.
///
/// `size` is clamped to `1..=MAX_PLANTS_PER_REQUEST`. Order is preserved and
/// every plant lands in exactly one batch.
pub fn batches(plants: &[PlantCode], size: usize) -> std::slice::Chunks<'_, PlantCode> {
    plants.chunks(size.clamp(1, MAX_PLANTS_PER_REQUEST))
}

/// Drops repeated codes, keeping the first occurrence.
fn unique_in_order(plants: &[PlantCode]) -> Vec<PlantCode> {
    let mut seen = HashSet::new();
    plants
        .iter()
        .filter(|code| seen.insert(*code))
        .cloned()
        .collect()
}

/// Result of one pass over all batches.
enum Pass {
    Complete(MergedForecast),
    RateLimited { batch: usize },
}

// ============================================================================
// Batch Forecast Fetcher
// ============================================================================

/// Fetches per-plant forecasts for a date, batch by batch.
#[derive(Clone)]
pub struct BatchForecastFetcher {
    api: Arc<dyn OnsApi>,
    tokens: TokenManager,
    sleeper: Arc<dyn Sleeper>,
    policy: RateLimitPolicy,
    batch_size: usize,
}

impl BatchForecastFetcher {
    /// Creates a fetcher with the default batch size, cooldown and timer.
    pub fn new(api: Arc<dyn OnsApi>) -> Self {
        Self {
            tokens: TokenManager::new(Arc::clone(&api)),
            api,
            sleeper: Arc::new(TokioSleeper),
            policy: RateLimitPolicy::default(),
            batch_size: MAX_PLANTS_PER_REQUEST,
        }
    }

    /// Sets the sleeper used for rate-limit cooldowns.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Sets the rate-limit policy.
    pub fn with_policy(mut self, policy: RateLimitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the batch size, clamped to `1..=MAX_PLANTS_PER_REQUEST`.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.clamp(1, MAX_PLANTS_PER_REQUEST);
        self
    }

    /// Returns the effective batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Fetches the forecast for `plants` on `date`.
    ///
    /// An empty plant list returns an empty forecast without touching the
    /// network. If the token is renewed along the way, `session` holds the
    /// new pair afterwards, even when the fetch itself fails later.
    ///
    /// # Errors
    ///
    /// - `FetchError::AuthRequired` if the token expired and renewal was
    ///   rejected
    /// - `FetchError::Auth` if renewal answered without a usable token pair
    ///   or failed in transport
    /// - `FetchError::FailedAfterRenewal` if the retry after renewal failed
    /// - `FetchError::UnexpectedStatus` for any other non-200 batch
    /// - `FetchError::RateLimited` if a restart cap is set and exhausted
    /// - `FetchError::Schema` if a response breaks the schema or repeats a
    ///   plant
    #[instrument(skip(self, session, plants), fields(date = %date, plants = plants.len()))]
    pub async fn fetch(
        &self,
        session: &mut Session,
        date: NaiveDate,
        plants: &[PlantCode],
    ) -> Result<MergedForecast, FetchError> {
        let plants = unique_in_order(plants);
        if plants.is_empty() {
            debug!("No plants selected, skipping fetch");
            return Ok(MergedForecast::new(date));
        }

        let mut restarts = 0u32;
        loop {
            match self.fetch_pass(session, date, &plants).await? {
                Pass::Complete(merged) => {
                    info!(records = merged.len(), restarts, "Forecast fetched");
                    return Ok(merged);
                }
                Pass::RateLimited { batch } => {
                    if !self.policy.allows_restart(restarts) {
                        warn!(batch, restarts, "Rate limited, restart limit reached");
                        return Err(FetchError::RateLimited { restarts });
                    }
                    restarts += 1;
                    warn!(
                        batch,
                        restart = restarts,
                        cooldown_secs = self.policy.cooldown.as_secs(),
                        "Rate limited, waiting before restarting fetch"
                    );
                    self.sleeper.sleep(self.policy.cooldown).await;
                }
            }
        }
    }

    /// Runs every batch once, in order.
    async fn fetch_pass(
        &self,
        session: &mut Session,
        date: NaiveDate,
        plants: &[PlantCode],
    ) -> Result<Pass, FetchError> {
        let mut merged = MergedForecast::new(date);

        for (idx, chunk) in batches(plants, self.batch_size).enumerate() {
            let batch = idx + 1;
            let request = ForecastRequest::new(date, chunk)?;
            debug!(batch, size = chunk.len(), "Requesting forecast batch");

            let reply = self
                .api
                .list_generation(session.access_token(), &request)
                .await?;

            let response = match reply {
                GenerationReply::Success(response) => response,
                GenerationReply::Unauthorized => {
                    self.renew_and_retry(session, &request, batch).await?
                }
                GenerationReply::RateLimited => return Ok(Pass::RateLimited { batch }),
                GenerationReply::Failed(status) => {
                    warn!(batch, status, "Forecast batch failed");
                    return Err(FetchError::UnexpectedStatus { batch, status });
                }
            };

            merged.extend(response.plants)?;
        }

        Ok(Pass::Complete(merged))
    }

    /// Renews the session tokens and retries `request` exactly once.
    async fn renew_and_retry(
        &self,
        session: &mut Session,
        request: &ForecastRequest,
        batch: usize,
    ) -> Result<GenerationResponse, FetchError> {
        warn!(batch, "Access token expired, renewing");

        let tokens = match self.tokens.renew(session.refresh_token()).await {
            Ok(tokens) => tokens,
            Err(AuthError::RenewalRejected { status }) => {
                return Err(FetchError::AuthRequired { status });
            }
            Err(e) => return Err(e.into()),
        };
        session.replace_tokens(tokens);

        match self
            .api
            .list_generation(session.access_token(), request)
            .await?
        {
            GenerationReply::Success(response) => Ok(response),
            other => {
                let status = other.status();
                warn!(batch, status, "Forecast batch failed after renewal");
                Err(FetchError::FailedAfterRenewal { batch, status })
            }
        }
    }
}

impl std::fmt::Debug for BatchForecastFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchForecastFetcher")
            .field("policy", &self.policy)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}
