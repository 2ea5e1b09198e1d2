//! The rate limit gate in front of routing.

use std::sync::Arc;

use http::HeaderMap;
use portico_config::RateLimitSettings;
use portico_core::Request;
use portico_limiter::{client_identifier, CounterStore, FixedWindowLimiter, RateDecision};

/// Predicate deciding whether a request bypasses the gate entirely.
pub type SkipPredicate = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// Applies a [`FixedWindowLimiter`] to inbound requests before routing.
///
/// The client identity comes from a trusted edge header (`cf-connecting-ip`
/// by default); requests without it share one `unknown` bucket. A skip
/// predicate can exempt paths such as health checks.
#[derive(Clone)]
pub struct RateLimitGate {
    limiter: FixedWindowLimiter,
    limit: u64,
    window_seconds: u64,
    client_header: String,
    skip: Option<SkipPredicate>,
}

impl RateLimitGate {
    /// Creates a gate over the given store with the default client header.
    #[must_use]
    pub fn new(store: Arc<dyn CounterStore>, limit: u64, window_seconds: u64) -> Self {
        Self {
            limiter: FixedWindowLimiter::new(store),
            limit,
            window_seconds,
            client_header: "cf-connecting-ip".to_string(),
            skip: None,
        }
    }

    /// Creates a gate from configuration. Returns `None` when disabled.
    #[must_use]
    pub fn from_settings(settings: &RateLimitSettings, store: Arc<dyn CounterStore>) -> Option<Self> {
        if !settings.enabled {
            return None;
        }
        Some(
            Self::new(store, settings.limit, settings.window_seconds)
                .client_header(settings.client_header.clone()),
        )
    }

    /// Sets the header the client identity is read from.
    #[must_use]
    pub fn client_header(mut self, header: impl Into<String>) -> Self {
        self.client_header = header.into().to_lowercase();
        self
    }

    /// Exempts requests matching the predicate from rate limiting.
    #[must_use]
    pub fn skip_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.skip = Some(Arc::new(predicate));
        self
    }

    /// Returns the configured per-window limit.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Returns true if the request bypasses the gate.
    #[must_use]
    pub fn skips(&self, request: &Request) -> bool {
        self.skip.as_ref().is_some_and(|predicate| predicate(request))
    }

    /// Checks the request's client against the limiter.
    pub async fn check(&self, headers: &HeaderMap) -> RateDecision {
        let client = client_identifier(headers, &self.client_header);
        self.limiter
            .check(&client, self.limit, self.window_seconds)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::Full;
    use portico_test::MemoryCounterStore;

    fn request(path: &str) -> Request {
        http::Request::builder()
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_gate_denies_after_limit() {
        let gate = RateLimitGate::new(Arc::new(MemoryCounterStore::new()), 2, 86_400);
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", "10.0.0.1".parse().unwrap());

        assert!(gate.check(&headers).await.may_proceed());
        assert!(gate.check(&headers).await.may_proceed());
        assert!(matches!(
            gate.check(&headers).await,
            RateDecision::Denied { .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_header_shares_unknown_bucket() {
        let gate = RateLimitGate::new(Arc::new(MemoryCounterStore::new()), 1, 86_400);
        let headers = HeaderMap::new();

        assert!(gate.check(&headers).await.may_proceed());
        assert!(!gate.check(&headers).await.may_proceed());
    }

    #[test]
    fn test_skip_predicate() {
        let gate = RateLimitGate::new(Arc::new(MemoryCounterStore::new()), 1, 60)
            .skip_when(|req| req.uri().path() == "/health");

        assert!(gate.skips(&request("/health")));
        assert!(!gate.skips(&request("/users")));
    }

    #[test]
    fn test_from_settings_disabled() {
        let settings = RateLimitSettings::default();
        assert!(RateLimitGate::from_settings(&settings, Arc::new(MemoryCounterStore::new())).is_none());
    }

    #[test]
    fn test_from_settings_enabled() {
        let settings = RateLimitSettings {
            enabled: true,
            limit: 5,
            window_seconds: 30,
            client_header: "X-Real-IP".to_string(),
        };
        let gate =
            RateLimitGate::from_settings(&settings, Arc::new(MemoryCounterStore::new())).unwrap();
        assert_eq!(gate.limit(), 5);
        assert_eq!(gate.client_header, "x-real-ip");
    }
}
