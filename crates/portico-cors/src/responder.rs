//! Preflight responses and response header mutation.

use http::header::{HeaderName, HeaderValue, VARY};
use http::StatusCode;
use portico_core::{Response, ResponseExt};

use crate::policy::CorsPolicy;

/// `Access-Control-*` header names.
mod headers {
    use http::header::HeaderName;

    pub const ALLOW_ORIGIN: HeaderName = HeaderName::from_static("access-control-allow-origin");
    pub const ALLOW_METHODS: HeaderName = HeaderName::from_static("access-control-allow-methods");
    pub const ALLOW_HEADERS: HeaderName = HeaderName::from_static("access-control-allow-headers");
    pub const ALLOW_CREDENTIALS: HeaderName =
        HeaderName::from_static("access-control-allow-credentials");
    pub const EXPOSE_HEADERS: HeaderName = HeaderName::from_static("access-control-expose-headers");
    pub const MAX_AGE: HeaderName = HeaderName::from_static("access-control-max-age");
}

/// Builds preflight responses and decorates outgoing responses according to
/// one [`CorsPolicy`].
#[derive(Debug, Clone)]
pub struct CorsResponder {
    policy: CorsPolicy,
}

impl CorsResponder {
    /// Creates a responder for the given policy.
    #[must_use]
    pub const fn new(policy: CorsPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy.
    #[must_use]
    pub const fn policy(&self) -> &CorsPolicy {
        &self.policy
    }

    /// Builds the full preflight response for an `OPTIONS` request.
    ///
    /// Always 204 with an empty body. The `Access-Control-Allow-*` headers
    /// are present only when the request origin resolves against the policy;
    /// a disallowed origin gets a bare 204 and the browser enforces the rest.
    #[must_use]
    pub fn preflight(&self, origin: Option<&str>) -> Response {
        let mut response = Response::empty(StatusCode::NO_CONTENT);

        if let Some(grant) = self.policy.resolve(origin) {
            let headers = response.headers_mut();
            headers.insert(headers::ALLOW_ORIGIN, grant.origin);
            insert_joined(headers, headers::ALLOW_METHODS, &self.policy.methods_header());
            insert_joined(headers, headers::ALLOW_HEADERS, &self.policy.headers_header());
            headers.insert(
                headers::MAX_AGE,
                HeaderValue::from(self.policy.max_age_seconds()),
            );
            if grant.credentials {
                headers.insert(headers::ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
            }
        }

        self.add_vary(&mut response);
        response
    }

    /// Adds CORS headers to an outgoing response without altering status or
    /// body. Applied by the dispatcher to success and error responses alike.
    pub fn apply(&self, origin: Option<&str>, response: &mut Response) {
        if let Some(grant) = self.policy.resolve(origin) {
            let headers = response.headers_mut();
            headers.insert(headers::ALLOW_ORIGIN, grant.origin);
            if grant.credentials {
                headers.insert(headers::ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
            }
            let exposed = self.policy.expose_header();
            if !exposed.is_empty() {
                insert_joined(headers, headers::EXPOSE_HEADERS, &exposed);
            }
        }
        self.add_vary(response);
    }

    fn add_vary(&self, response: &mut Response) {
        if self.policy.allowed_origins.is_origin_dependent() {
            response
                .headers_mut()
                .insert(VARY, HeaderValue::from_static("origin"));
        }
    }
}

fn insert_joined(headers: &mut http::HeaderMap, name: HeaderName, joined: &str) {
    if let Ok(value) = HeaderValue::from_str(joined) {
        headers.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::Full;

    fn list_responder() -> CorsResponder {
        CorsResponder::new(
            CorsPolicy::builder()
                .allow_origin("https://example.com")
                .allow_credentials(true)
                .expose_headers(["x-request-id"])
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_preflight_allowed_origin() {
        let responder = list_responder();
        let response = responder.preflight(Some("https://example.com"));

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-credentials")
                .unwrap(),
            "true"
        );
        assert!(response.headers().get("access-control-allow-methods").is_some());
        assert!(response.headers().get("access-control-max-age").is_some());
    }

    #[test]
    fn test_preflight_disallowed_origin_has_no_cors_headers() {
        let responder = list_responder();
        let response = responder.preflight(Some("https://evil.com"));

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get("access-control-allow-origin").is_none());
        assert!(response
            .headers()
            .get("access-control-allow-credentials")
            .is_none());
    }

    #[test]
    fn test_apply_preserves_status_and_body() {
        let responder = list_responder();
        let mut response = http::Response::builder()
            .status(StatusCode::IM_A_TEAPOT)
            .body(Full::new(Bytes::from("tea")))
            .unwrap();

        responder.apply(Some("https://example.com"), &mut response);

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            response
                .headers()
                .get("access-control-expose-headers")
                .unwrap(),
            "x-request-id"
        );
        assert_eq!(response.headers().get(VARY).unwrap(), "origin");
    }

    #[test]
    fn test_wildcard_never_emits_credentials() {
        let responder = CorsResponder::new(
            CorsPolicy::builder().allow_any_origin().build().unwrap(),
        );
        let mut response = Response::empty(StatusCode::OK);
        responder.apply(Some("https://anywhere.example"), &mut response);

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://anywhere.example"
        );
        assert!(response
            .headers()
            .get("access-control-allow-credentials")
            .is_none());
    }
}
