//! The fixed-window counter algorithm.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::store::CounterStore;

/// Safety margin added to the window length when computing the stored TTL,
/// so a counter is never evicted before its window ends.
const TTL_MARGIN_SECS: u64 = 10;

/// The per-`(window, client)` state persisted in the counter store.
///
/// `reset_at` is fixed when the window's first request creates the state and
/// carried through every overwrite; it is never recomputed mid-window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitState {
    /// Requests counted in the current window.
    pub count: u64,
    /// Epoch milliseconds at which the window expires.
    pub reset_at: u64,
}

/// The outcome of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateDecision {
    /// The client may proceed.
    Allowed {
        /// Requests left in the window after this one.
        remaining: u64,
        /// Epoch milliseconds at which the window resets.
        reset_at_ms: u64,
    },
    /// The client exceeded the limit for this window.
    Denied {
        /// Seconds the client should wait before retrying.
        retry_after_seconds: u64,
        /// Epoch milliseconds at which the window resets.
        reset_at_ms: u64,
    },
    /// The counter store could not be read or written; the request proceeds.
    ///
    /// Not an `Allowed`: operators need to tell store degradation apart from
    /// normal traffic, so this is surfaced as its own outcome and logged at
    /// WARN where it happens.
    StoreUnavailable,
}

impl RateDecision {
    /// Returns true unless the decision is an explicit denial.
    #[must_use]
    pub const fn may_proceed(&self) -> bool {
        !matches!(self, Self::Denied { .. })
    }
}

/// A fixed-window rate limiter over a [`CounterStore`].
///
/// Stateless apart from the store handle: every check derives its window from
/// the clock, reads the counter, and writes it back. See the crate docs for
/// the two documented weaknesses (non-atomic counting, boundary straddle).
#[derive(Clone)]
pub struct FixedWindowLimiter {
    store: Arc<dyn CounterStore>,
}

impl FixedWindowLimiter {
    /// Creates a limiter backed by the given store.
    #[must_use]
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Checks whether `client` may proceed, using the current wall clock.
    pub async fn check(&self, client: &str, limit: u64, window_seconds: u64) -> RateDecision {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        self.check_at(now_ms, client, limit, window_seconds).await
    }

    /// Checks whether `client` may proceed at an explicit instant.
    ///
    /// The deterministic entry point: window behavior is testable without
    /// sleeping through real windows.
    pub async fn check_at(
        &self,
        now_ms: u64,
        client: &str,
        limit: u64,
        window_seconds: u64,
    ) -> RateDecision {
        let window_ms = window_seconds.max(1) * 1000;
        let window_id = now_ms / window_ms;
        let window_start = window_id * window_ms;
        let key = format!("ratelimit:{window_id}:{client}");

        let stored = match self.store.get(&key).await {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%error, client, "counter store read failed, failing open");
                return RateDecision::StoreUnavailable;
            }
        };

        let state = stored
            .as_deref()
            .and_then(|raw| serde_json::from_str::<RateLimitState>(raw).ok())
            .unwrap_or(RateLimitState {
                count: 0,
                reset_at: window_start + window_ms,
            });

        // Decision is made on the pre-increment count.
        if state.count >= limit {
            let retry_after_seconds = state.reset_at.saturating_sub(now_ms).div_ceil(1000).max(1);
            return RateDecision::Denied {
                retry_after_seconds,
                reset_at_ms: state.reset_at,
            };
        }

        let next = RateLimitState {
            count: state.count + 1,
            reset_at: state.reset_at,
        };
        let remaining = limit - next.count;

        // RateLimitState serializes infallibly (two integers).
        let raw = serde_json::to_string(&next)
            .unwrap_or_else(|_| format!("{{\"count\":{},\"reset_at\":{}}}", next.count, next.reset_at));
        let ttl_seconds = window_seconds.max(1) + TTL_MARGIN_SECS;

        if let Err(error) = self.store.put(&key, raw, ttl_seconds).await {
            tracing::warn!(%error, client, "counter store write failed, failing open");
            return RateDecision::StoreUnavailable;
        }

        RateDecision::Allowed {
            remaining,
            reset_at_ms: next.reset_at,
        }
    }
}
