//! The dispatcher: one request in, one response out.

use http::header::{HeaderName, HeaderValue, ALLOW, ORIGIN, RETRY_AFTER};
use http::Method;
use portico_config::{ConfigError, PorticoConfig};
use portico_core::{PorticoError, Request, RequestContext, RequestId, Response};
use portico_cors::{CorsPolicy, CorsResponder};
use portico_limiter::RateDecision;
use portico_middleware::{BoxedMiddleware, Pipeline};
use portico_router::{MatchOutcome, Router};

use crate::endpoint::Endpoint;
use crate::gate::RateLimitGate;

const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");
const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Builder for a [`Dispatcher`].
#[must_use]
pub struct DispatcherBuilder {
    router: Router<Endpoint>,
    stages: Vec<BoxedMiddleware>,
    cors: Option<CorsResponder>,
    gate: Option<RateLimitGate>,
    expose_internal_errors: bool,
    request_id_header: HeaderName,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self {
            router: Router::default(),
            stages: Vec::new(),
            cors: None,
            gate: None,
            expose_internal_errors: false,
            request_id_header: X_REQUEST_ID,
        }
    }
}

impl DispatcherBuilder {
    /// Registers a route. Matching is first-registered-wins.
    pub fn route(mut self, method: Method, pattern: impl Into<String>, endpoint: Endpoint) -> Self {
        self.router.route(method, pattern, endpoint);
        self
    }

    /// Appends a global middleware stage, in execution order.
    pub fn middleware(mut self, stage: BoxedMiddleware) -> Self {
        self.stages.push(stage);
        self
    }

    /// Enables CORS handling with the given policy.
    pub fn cors(mut self, policy: CorsPolicy) -> Self {
        self.cors = Some(CorsResponder::new(policy));
        self
    }

    /// Enables the rate limit gate.
    pub fn rate_limit(mut self, gate: RateLimitGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Includes internal error detail in 500 bodies. Development only.
    pub fn expose_internal_errors(mut self, expose: bool) -> Self {
        self.expose_internal_errors = expose;
        self
    }

    /// Sets the header an upstream request ID is propagated from and echoed
    /// back on.
    pub fn request_id_header(mut self, header: HeaderName) -> Self {
        self.request_id_header = header;
        self
    }

    /// Applies a loaded configuration: CORS policy, error exposure, and the
    /// request ID header. The rate limit gate needs a store, so it is wired
    /// separately through [`RateLimitGate::from_settings`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the CORS section cannot be turned into a
    /// policy or the request ID header name is invalid.
    pub fn configure(mut self, config: &PorticoConfig) -> Result<Self, ConfigError> {
        if let Some(policy) = config.cors.to_policy()? {
            self.cors = Some(CorsResponder::new(policy));
        }
        self.expose_internal_errors = config.expose_internal_errors;
        self.request_id_header = HeaderName::try_from(config.request_id_header.as_str())
            .map_err(|_| ConfigError::invalid("request_id_header", "not a valid header name"))?;
        Ok(self)
    }

    /// Finalizes the dispatcher.
    #[must_use]
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            router: self.router,
            pipeline: Pipeline::new(self.stages),
            cors: self.cors,
            gate: self.gate,
            expose_internal_errors: self.expose_internal_errors,
            request_id_header: self.request_id_header,
        }
    }
}

/// The single entry point for inbound requests.
///
/// Every request flows through the same sequence: CORS preflight
/// short-circuit, rate limit gate, route match, middleware pipeline,
/// terminal handler. Errors from any stage surface here and nowhere else,
/// and every response leaves with CORS headers and the request ID attached,
/// error responses included.
pub struct Dispatcher {
    router: Router<Endpoint>,
    pipeline: Pipeline,
    cors: Option<CorsResponder>,
    gate: Option<RateLimitGate>,
    expose_internal_errors: bool,
    request_id_header: HeaderName,
}

impl Dispatcher {
    /// Starts building a dispatcher.
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Dispatches one request to a response. Infallible by construction:
    /// every error becomes a JSON error envelope.
    pub async fn dispatch(&self, request: Request) -> Response {
        let request_id = request
            .headers()
            .get(&self.request_id_header)
            .and_then(|v| v.to_str().ok())
            .and_then(RequestId::parse)
            .unwrap_or_default();
        let origin = request
            .headers()
            .get(ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        // Preflight never reaches routing or the pipeline.
        if request.method() == Method::OPTIONS {
            if let Some(cors) = &self.cors {
                let mut response = cors.preflight(origin.as_deref());
                self.stamp_request_id(request_id, &mut response);
                return response;
            }
        }

        let mut allowance = None;
        if let Some(gate) = &self.gate {
            if !gate.skips(&request) {
                match gate.check(request.headers()).await {
                    RateDecision::Allowed {
                        remaining,
                        reset_at_ms,
                    } => allowance = Some((gate.limit(), remaining, reset_at_ms)),
                    RateDecision::Denied {
                        retry_after_seconds,
                        reset_at_ms,
                    } => {
                        let error = PorticoError::RateLimitExceeded {
                            retry_after_seconds,
                            reset_at_ms,
                        };
                        let mut response = self.error_response(&error, request_id);
                        self.finish(origin.as_deref(), request_id, &mut response);
                        return response;
                    }
                    RateDecision::StoreUnavailable => {}
                }
            }
        }

        let result = self.run(request, request_id).await;

        let mut response = match result {
            Ok(response) => response,
            Err(error) => {
                if matches!(error, PorticoError::Internal { .. }) {
                    tracing::error!(request_id = %request_id, error = %error, "request failed");
                }
                self.error_response(&error, request_id)
            }
        };

        if let Some((limit, remaining, reset_at_ms)) = allowance {
            let headers = response.headers_mut();
            headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(limit));
            headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
            headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset_at_ms / 1000));
        }

        self.finish(origin.as_deref(), request_id, &mut response);
        response
    }

    async fn run(&self, request: Request, request_id: RequestId) -> Result<Response, PorticoError> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let matched = match self.router.match_route(&method, &path) {
            MatchOutcome::Matched(matched) => matched,
            MatchOutcome::MethodNotAllowed { allowed } => {
                return Err(PorticoError::MethodNotAllowed { allowed });
            }
            MatchOutcome::NotFound => return Err(PorticoError::RouteNotFound { path }),
        };

        tracing::debug!(
            request_id = %request_id,
            http.method = %method,
            pattern = matched.pattern,
            "route matched"
        );

        let mut ctx = RequestContext::with_request_id(request_id);
        self.pipeline
            .run(
                &matched.endpoint.stages,
                &mut ctx,
                request,
                &matched.endpoint.handler,
                matched.params,
            )
            .await
    }

    /// Builds the error envelope plus any status-specific headers.
    fn error_response(&self, error: &PorticoError, request_id: RequestId) -> Response {
        let mut response = error.to_response(request_id, self.expose_internal_errors);
        match error {
            PorticoError::MethodNotAllowed { allowed } => {
                let joined = allowed
                    .iter()
                    .map(Method::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if let Ok(value) = HeaderValue::from_str(&joined) {
                    response.headers_mut().insert(ALLOW, value);
                }
            }
            PorticoError::RateLimitExceeded {
                retry_after_seconds,
                reset_at_ms,
            } => {
                let headers = response.headers_mut();
                headers.insert(RETRY_AFTER, HeaderValue::from(*retry_after_seconds));
                headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(0u64));
                headers.insert(X_RATELIMIT_RESET, HeaderValue::from(reset_at_ms / 1000));
            }
            _ => {}
        }
        response
    }

    /// The decoration every outgoing response gets, error paths included.
    fn finish(&self, origin: Option<&str>, request_id: RequestId, response: &mut Response) {
        if let Some(cors) = &self.cors {
            cors.apply(origin, response);
        }
        self.stamp_request_id(request_id, response);
    }

    fn stamp_request_id(&self, request_id: RequestId, response: &mut Response) {
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response
                .headers_mut()
                .insert(self.request_id_header.clone(), value);
        }
    }
}
