//! Error taxonomy and wire envelope.
//!
//! Nothing inside the router or middleware pipeline catches errors for
//! recovery; every error propagates to the dispatcher boundary, which maps
//! it onto an [`ErrorEnvelope`] exactly once. That single recovery point is
//! what guarantees a uniform response shape and that CORS headers are still
//! attached on error paths.

use http::{Method, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::types::{Response, ResponseExt};
use crate::RequestId;

/// Result type alias using [`PorticoError`].
pub type PorticoResult<T> = Result<T, PorticoError>;

/// The dispatch core's error taxonomy.
///
/// The first three variants are produced by the core itself (router and rate
/// limiter); everything raised inside middleware or handlers surfaces as one
/// of the remaining variants, or is wrapped into [`PorticoError::Internal`]
/// at the dispatcher boundary.
#[derive(Error, Debug)]
pub enum PorticoError {
    /// No registered route pattern matches the request path.
    #[error("no route matches {path}")]
    RouteNotFound {
        /// The unmatched request path.
        path: String,
    },

    /// A pattern matches the path, but not the request's method.
    #[error("method not allowed")]
    MethodNotAllowed {
        /// Methods that are registered for this path, for the `Allow` header.
        allowed: Vec<Method>,
    },

    /// The rate limiter denied the request.
    ///
    /// Distinct from a counter-store failure, which is not an error at all —
    /// the limiter fails open.
    #[error("rate limit exceeded, retry after {retry_after_seconds}s")]
    RateLimitExceeded {
        /// Seconds until the current window resets.
        retry_after_seconds: u64,
        /// Epoch milliseconds at which the window resets.
        reset_at_ms: u64,
    },

    /// Request validation failed inside a middleware or handler.
    #[error("bad request: {message}")]
    BadRequest {
        /// Human-readable error message.
        message: String,
    },

    /// A short-circuiting middleware rejected an unauthenticated request.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message.
        message: String,
    },

    /// Anything else raised inside the pipeline or terminal handler.
    #[error("internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error. Logged, never sent to clients.
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl PorticoError {
    /// Creates a bad-request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates an internal error from a message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error wrapping an underlying cause.
    #[must_use]
    pub fn internal_with_source(message: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RouteNotFound { .. } => "not_found",
            Self::MethodNotAllowed { .. } => "method_not_allowed",
            Self::RateLimitExceeded { .. } => "rate_limit_exceeded",
            Self::BadRequest { .. } => "bad_request",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Internal { .. } => "internal_error",
        }
    }

    /// Returns the message shown to clients.
    ///
    /// Internal errors are redacted unless `expose_internal` is set
    /// (development configurations only).
    #[must_use]
    pub fn client_message(&self, expose_internal: bool) -> String {
        match self {
            Self::RouteNotFound { .. } => "Not Found".to_string(),
            Self::MethodNotAllowed { .. } => "Method Not Allowed".to_string(),
            Self::RateLimitExceeded { .. } => "Too Many Requests".to_string(),
            Self::BadRequest { message } | Self::Unauthorized { message } => message.clone(),
            Self::Internal { message, source } => {
                if expose_internal {
                    source
                        .as_ref()
                        .map_or_else(|| message.clone(), |s| format!("{message}: {s}"))
                } else {
                    "Internal Server Error".to_string()
                }
            }
        }
    }

    /// Builds the JSON error response for this error.
    ///
    /// Status-specific headers (`Allow`, `Retry-After`, rate limit headers)
    /// are the dispatcher's responsibility; this only produces status and
    /// body.
    #[must_use]
    pub fn to_response(&self, request_id: RequestId, expose_internal: bool) -> Response {
        let envelope = ErrorEnvelope {
            error: ErrorBody {
                code: self.code(),
                message: self.client_message(expose_internal),
                request_id: request_id.to_string(),
            },
        };
        // ErrorEnvelope serializes infallibly (strings only).
        let body = serde_json::to_value(&envelope)
            .unwrap_or_else(|_| serde_json::json!({"error": {"code": "internal_error"}}));
        Response::json(self.status_code(), &body)
    }
}

impl From<anyhow::Error> for PorticoError {
    fn from(source: anyhow::Error) -> Self {
        Self::Internal {
            message: "unhandled error".to_string(),
            source: Some(source),
        }
    }
}

/// The JSON error envelope returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    /// The error payload.
    pub error: ErrorBody,
}

/// The inner payload of an [`ErrorEnvelope`].
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable code, e.g. `not_found`.
    pub code: &'static str,
    /// Human-readable message. Redacted for internal errors in production.
    pub message: String,
    /// The request ID, for support correlation.
    pub request_id: String,
}
