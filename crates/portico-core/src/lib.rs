//! Core types for the Portico dispatch core.
//!
//! This crate holds the pieces shared by every other Portico crate:
//!
//! - [`Request`] / [`Response`] type aliases over `http` with a `Full<Bytes>`
//!   body, plus the [`ResponseExt`] helpers for building JSON responses.
//! - [`RequestId`] and [`RequestContext`], the per-invocation state that flows
//!   through the middleware pipeline into handlers.
//! - [`PorticoError`], the single error taxonomy, and its JSON
//!   [`ErrorEnvelope`] wire shape.
//! - The type-erased handler signature ([`BoxHandler`]) that couples the
//!   dispatch core to external request handlers.

mod context;
mod error;
mod handler;
mod types;

pub use context::{RequestContext, RequestId};
pub use error::{ErrorBody, ErrorEnvelope, PorticoError, PorticoResult};
pub use handler::{handler_fn, BoxHandler, HandlerFuture};
pub use types::{BoxFuture, Request, Response, ResponseExt};
