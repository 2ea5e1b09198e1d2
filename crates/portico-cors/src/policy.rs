//! CORS policy configuration and origin resolution.

use http::{HeaderValue, Method};
use thiserror::Error;

/// Errors raised while building a [`CorsPolicy`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorsPolicyError {
    /// Wildcard origins and credentials cannot be combined.
    #[error("a wildcard origin policy cannot allow credentials")]
    WildcardWithCredentials,

    /// An origin value is not a valid header value.
    #[error("invalid origin value: {0}")]
    InvalidOrigin(String),
}

/// The set of origins a policy accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// Accept any origin (`*` in configuration).
    Any,
    /// Accept only exact matches from this list.
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Returns true if responses depend on the request origin, which
    /// requires a `Vary: Origin` header for cache correctness.
    #[must_use]
    pub fn is_origin_dependent(&self) -> bool {
        // Wildcard policies echo the request origin too, so both forms vary.
        true
    }
}

/// What a resolved origin is granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginGrant {
    /// The value to emit as `Access-Control-Allow-Origin`.
    pub origin: HeaderValue,
    /// Whether `Access-Control-Allow-Credentials: true` may be emitted.
    ///
    /// Only ever true for an exact (non-wildcard) origin match; wildcard
    /// grants never carry credentials.
    pub credentials: bool,
}

/// A static CORS policy.
///
/// Built once at startup via [`CorsPolicy::builder`]; immutable afterwards.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    pub(crate) allowed_origins: AllowedOrigins,
    pub(crate) allowed_methods: Vec<Method>,
    pub(crate) allowed_headers: Vec<String>,
    pub(crate) exposed_headers: Vec<String>,
    pub(crate) max_age_seconds: u64,
    pub(crate) allow_credentials: bool,
}

impl CorsPolicy {
    /// Starts building a policy.
    #[must_use]
    pub fn builder() -> CorsPolicyBuilder {
        CorsPolicyBuilder::default()
    }

    /// Resolves the request's `Origin` header against this policy.
    ///
    /// - Wildcard policy: every origin is echoed back; with no `Origin`
    ///   header at all, a literal `*` is granted. Credentials are never
    ///   advertised under a wildcard.
    /// - List policy: only an exact match is echoed, and credentials are
    ///   advertised only when configured.
    #[must_use]
    pub fn resolve(&self, origin: Option<&str>) -> Option<OriginGrant> {
        match (&self.allowed_origins, origin) {
            (AllowedOrigins::Any, Some(o)) => HeaderValue::from_str(o).ok().map(|origin| {
                OriginGrant {
                    origin,
                    credentials: false,
                }
            }),
            (AllowedOrigins::Any, None) => Some(OriginGrant {
                origin: HeaderValue::from_static("*"),
                credentials: false,
            }),
            (AllowedOrigins::List(list), Some(o)) => {
                if list.iter().any(|allowed| allowed == o) {
                    HeaderValue::from_str(o).ok().map(|origin| OriginGrant {
                        origin,
                        credentials: self.allow_credentials,
                    })
                } else {
                    None
                }
            }
            (AllowedOrigins::List(_), None) => None,
        }
    }

    /// Returns the allowed methods, comma-joined for the preflight header.
    #[must_use]
    pub fn methods_header(&self) -> String {
        self.allowed_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Returns the allowed request headers, comma-joined.
    #[must_use]
    pub fn headers_header(&self) -> String {
        self.allowed_headers.join(", ")
    }

    /// Returns the exposed response headers, comma-joined; empty if none.
    #[must_use]
    pub fn expose_header(&self) -> String {
        self.exposed_headers.join(", ")
    }

    /// Returns the preflight cache lifetime in seconds.
    #[must_use]
    pub const fn max_age_seconds(&self) -> u64 {
        self.max_age_seconds
    }
}

/// Builder for [`CorsPolicy`].
#[derive(Debug, Clone)]
pub struct CorsPolicyBuilder {
    origins: Vec<String>,
    any_origin: bool,
    methods: Vec<Method>,
    headers: Vec<String>,
    exposed: Vec<String>,
    max_age_seconds: u64,
    credentials: bool,
}

impl Default for CorsPolicyBuilder {
    fn default() -> Self {
        Self {
            origins: Vec::new(),
            any_origin: false,
            methods: vec![
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
                Method::OPTIONS,
            ],
            headers: vec!["content-type".to_string(), "authorization".to_string()],
            exposed: Vec::new(),
            max_age_seconds: 86_400,
            credentials: false,
        }
    }
}

impl CorsPolicyBuilder {
    /// Allows a specific origin. `*` switches the policy to wildcard.
    #[must_use]
    pub fn allow_origin(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        if origin == "*" {
            self.any_origin = true;
        } else {
            self.origins.push(origin);
        }
        self
    }

    /// Allows every origin.
    #[must_use]
    pub fn allow_any_origin(mut self) -> Self {
        self.any_origin = true;
        self
    }

    /// Replaces the allowed method set.
    #[must_use]
    pub fn allow_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Replaces the allowed request header set.
    #[must_use]
    pub fn allow_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the exposed response header set.
    #[must_use]
    pub fn expose_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exposed = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the preflight cache lifetime.
    #[must_use]
    pub const fn max_age_seconds(mut self, seconds: u64) -> Self {
        self.max_age_seconds = seconds;
        self
    }

    /// Allows credentials. Invalid together with a wildcard origin.
    #[must_use]
    pub const fn allow_credentials(mut self, allow: bool) -> Self {
        self.credentials = allow;
        self
    }

    /// Validates and builds the policy.
    pub fn build(self) -> Result<CorsPolicy, CorsPolicyError> {
        if self.any_origin && self.credentials {
            return Err(CorsPolicyError::WildcardWithCredentials);
        }
        for origin in &self.origins {
            if HeaderValue::from_str(origin).is_err() {
                return Err(CorsPolicyError::InvalidOrigin(origin.clone()));
            }
        }
        let allowed_origins = if self.any_origin {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(self.origins)
        };
        Ok(CorsPolicy {
            allowed_origins,
            allowed_methods: self.methods,
            allowed_headers: self.headers,
            exposed_headers: self.exposed,
            max_age_seconds: self.max_age_seconds,
            allow_credentials: self.credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_echoes_any_origin_without_credentials() {
        let policy = CorsPolicy::builder().allow_any_origin().build().unwrap();
        let grant = policy.resolve(Some("https://anything.example")).unwrap();
        assert_eq!(grant.origin, "https://anything.example");
        assert!(!grant.credentials);
    }

    #[test]
    fn test_wildcard_without_origin_header_grants_star() {
        let policy = CorsPolicy::builder().allow_any_origin().build().unwrap();
        let grant = policy.resolve(None).unwrap();
        assert_eq!(grant.origin, "*");
    }

    #[test]
    fn test_list_policy_exact_match_only() {
        let policy = CorsPolicy::builder()
            .allow_origin("https://example.com")
            .allow_credentials(true)
            .build()
            .unwrap();

        let grant = policy.resolve(Some("https://example.com")).unwrap();
        assert_eq!(grant.origin, "https://example.com");
        assert!(grant.credentials);

        assert!(policy.resolve(Some("https://evil.com")).is_none());
        assert!(policy.resolve(Some("https://example.com.evil.com")).is_none());
        assert!(policy.resolve(None).is_none());
    }

    #[test]
    fn test_wildcard_plus_credentials_rejected() {
        let result = CorsPolicy::builder()
            .allow_any_origin()
            .allow_credentials(true)
            .build();
        assert_eq!(result.unwrap_err(), CorsPolicyError::WildcardWithCredentials);
    }

    #[test]
    fn test_star_in_origin_list_means_wildcard() {
        let policy = CorsPolicy::builder()
            .allow_origin("https://example.com")
            .allow_origin("*")
            .build()
            .unwrap();
        assert!(policy.resolve(Some("https://other.example")).is_some());
    }

    #[test]
    fn test_methods_header_is_comma_joined() {
        let policy = CorsPolicy::builder()
            .allow_any_origin()
            .allow_methods([Method::GET, Method::POST])
            .build()
            .unwrap();
        assert_eq!(policy.methods_header(), "GET, POST");
    }
}
