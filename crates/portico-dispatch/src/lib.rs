//! The Portico dispatcher: routing, middleware, CORS, and rate limiting
//! composed into one request-to-response entry point.
//!
//! [`Dispatcher::dispatch`] runs every inbound request through the same
//! sequence:
//!
//! 1. `OPTIONS` requests short-circuit to the CORS preflight response.
//! 2. The rate limit gate checks the client's fixed-window counter; denials
//!    become 429 responses and store failures fail open.
//! 3. The router resolves `(method, path)` to an endpoint, distinguishing
//!    404 (no pattern matches) from 405 (pattern matches, method does not).
//! 4. Global and route-specific middleware wrap the terminal handler.
//!
//! Errors raised anywhere inside are recovered exactly once, here, into a
//! uniform JSON envelope. CORS headers and the request ID are attached to
//! every response, error responses included.
//!
//! # Example
//!
//! ```ignore
//! use portico_dispatch::{Dispatcher, Endpoint};
//! use portico_core::{handler_fn, Response, ResponseExt};
//! use http::{Method, StatusCode};
//!
//! let dispatcher = Dispatcher::builder()
//!     .route(
//!         Method::GET,
//!         "/users/:id",
//!         Endpoint::new(handler_fn(|_ctx, _req, params| {
//!             let id = params.get("id").unwrap_or_default().to_string();
//!             async move {
//!                 Ok(Response::json(
//!                     StatusCode::OK,
//!                     &serde_json::json!({ "id": id }),
//!                 ))
//!             }
//!         })),
//!     )
//!     .build();
//!
//! let response = dispatcher.dispatch(request).await;
//! ```

mod dispatcher;
mod endpoint;
mod gate;
pub mod logging;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use endpoint::Endpoint;
pub use gate::{RateLimitGate, SkipPredicate};
pub use logging::{init_logging, LogConfig, LoggingError};
