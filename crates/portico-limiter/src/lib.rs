//! Fixed-window rate limiting backed by an external counter store.
//!
//! The limiter buckets time into fixed windows and keeps one counter per
//! `(window, client)` pair in a key-value [`CounterStore`] supplied by the
//! host environment. State expires through the store's own TTL mechanism;
//! nothing is ever deleted explicitly, so idle clients self-evict.
//!
//! Two deliberate weaknesses are part of the contract, not bugs:
//!
//! - The read-increment-write sequence is not atomic. Concurrent requests
//!   from one client can both observe the same pre-increment count and both
//!   be allowed, under-counting by up to the concurrency level minus one per
//!   window. Good enough for advisory throttling; do not use for hard quotas.
//! - Windows reset discretely at boundaries, so up to `2 × limit` requests
//!   can land across a boundary straddle.
//!
//! The limiter **fails open**: if the store is unreachable the request is
//! allowed, reported as the distinct [`RateDecision::StoreUnavailable`]
//! outcome and logged at WARN so store degradation is visible to operators.

mod identifier;
mod limiter;
mod store;

pub use identifier::{client_identifier, UNKNOWN_CLIENT};
pub use limiter::{FixedWindowLimiter, RateDecision, RateLimitState};
pub use store::{CounterStore, StoreError};
