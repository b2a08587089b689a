//! Rate-limit cooldown policy and injectable sleep.

use std::time::Duration;

use async_trait::async_trait;

/// Default cooldown after a 429, in seconds.
pub const DEFAULT_COOLDOWN_SECS: u64 = 60;

/// What to do when the forecast endpoint answers 429.
///
/// The fetcher waits `cooldown` and restarts the whole fetch from the first
/// batch. The delay does not grow between restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Wait before each restart.
    pub cooldown: Duration,
    /// Maximum number of restarts per fetch. `None` means unbounded.
    pub max_restarts: Option<u32>,
}

impl RateLimitPolicy {
    /// Creates an unbounded policy with the given cooldown.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            max_restarts: None,
        }
    }

    /// Caps the number of restarts per fetch.
    pub fn with_max_restarts(mut self, max: u32) -> Self {
        self.max_restarts = Some(max);
        self
    }

    /// Returns true if another restart is allowed after `done` restarts.
    pub fn allows_restart(&self, done: u32) -> bool {
        self.max_restarts.is_none_or(|max| done < max)
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_COOLDOWN_SECS))
    }
}

// ============================================================================
// Sleeper
// ============================================================================

/// Suspends the current task; swapped out in tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Sleeps for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
