//! The counter store interface.

use portico_core::BoxFuture;
use thiserror::Error;

/// A counter store operation failure.
///
/// Deliberately opaque: the limiter treats every store failure the same way
/// (fail open), so there is nothing to branch on beyond the message.
#[derive(Debug, Error)]
#[error("counter store error: {message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Creates a store error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a store error wrapping an underlying cause.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source),
        }
    }
}

/// The minimal async key-value interface the rate limiter needs.
///
/// Implemented by host-environment adapters (a managed KV namespace, Redis,
/// or the in-memory store from `portico-test`). No compare-and-swap or atomic
/// increment is assumed — `get` and `put` are all the limiter gets, which is
/// exactly why its counting is best-effort.
///
/// The core imposes no timeout on these calls; adapters deployed without an
/// ambient timeout should wrap their I/O in one, or a hung store call hangs
/// the request.
pub trait CounterStore: Send + Sync + 'static {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<String>, StoreError>>;

    /// Writes `value` under `key`, expiring after `ttl_seconds`.
    fn put(&self, key: &str, value: String, ttl_seconds: u64)
        -> BoxFuture<'_, Result<(), StoreError>>;

    /// Removes `key`. The limiter itself never calls this; it exists for
    /// adapters and operational tooling.
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<(), StoreError>>;
}
