//! # Portico
//!
//! **Request dispatch core: routing, middleware, CORS, and rate limiting**
//!
//! Portico turns one inbound HTTP request into one outbound response through
//! a fixed sequence:
//!
//! ```text
//! Request → Preflight? → RateLimit → Router → Middleware → Handler
//!                                                             ↓
//! Response ← RequestId ← CORS headers ← ErrorEnvelope ←──────┘
//! ```
//!
//! - **Registration-order routing** – `:name` path parameters, first match
//!   wins, 404 and 405 kept distinct with a correct `Allow` header.
//! - **Composable middleware** – ordered stages with a consumed `Next`
//!   continuation; short-circuit or propagate, never both.
//! - **CORS done at the boundary** – preflight short-circuit plus header
//!   decoration on every response, error responses included.
//! - **Fail-open rate limiting** – fixed-window counters in a pluggable
//!   store; store outages never take requests down with them.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use portico::prelude::*;
//! use http::{Method, StatusCode};
//!
//! let dispatcher = Dispatcher::builder()
//!     .route(
//!         Method::GET,
//!         "/users/:id",
//!         Endpoint::new(handler_fn(|_ctx, _req, params| {
//!             let id = params.get("id").unwrap_or("").to_string();
//!             async move {
//!                 Ok(Response::json(StatusCode::OK, &serde_json::json!({ "id": id })))
//!             }
//!         })),
//!     )
//!     .build();
//!
//! let response = dispatcher.dispatch(request).await;
//! ```

#![doc(html_root_url = "https://docs.rs/portico/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use portico_core as core;

// Re-export router types
pub use portico_router as router;

// Re-export middleware types
pub use portico_middleware as middleware;

// Re-export CORS types
pub use portico_cors as cors;

// Re-export rate limiting types
pub use portico_limiter as limiter;

// Re-export dispatcher types
pub use portico_dispatch as dispatch;

// Re-export configuration types
pub use portico_config as config;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use portico::prelude::*;
/// ```
pub mod prelude {
    pub use portico_core::{
        handler_fn, BoxHandler, PorticoError, PorticoResult, Request, RequestContext, RequestId,
        Response, ResponseExt,
    };

    pub use portico_router::{MatchOutcome, Params, Router};

    pub use portico_middleware::stages::TraceStage;
    pub use portico_middleware::{BoxedMiddleware, FnMiddleware, Middleware, Next, Pipeline};

    pub use portico_cors::{CorsPolicy, CorsResponder};

    pub use portico_limiter::{CounterStore, FixedWindowLimiter, RateDecision, StoreError};

    pub use portico_dispatch::{Dispatcher, Endpoint, RateLimitGate};

    pub use portico_config::{ConfigLoader, PorticoConfig};
}
