//! Ordered middleware pipeline for the Portico dispatch core.
//!
//! A middleware wraps everything registered after it: it can run logic before
//! and after downstream execution, short-circuit by returning a response
//! without calling [`Next::run`], or raise an error. Errors are never caught
//! inside the pipeline — they propagate to the dispatcher boundary, the
//! single recovery point.
//!
//! # Example
//!
//! ```ignore
//! use portico_middleware::{FnMiddleware, Next, Pipeline};
//! use portico_core::{BoxFuture, PorticoResult, Request, RequestContext, Response};
//! use std::sync::Arc;
//!
//! fn timing<'a>(
//!     ctx: &'a mut RequestContext,
//!     request: Request,
//!     next: Next<'a>,
//! ) -> BoxFuture<'a, PorticoResult<Response>> {
//!     Box::pin(async move {
//!         let response = next.run(ctx, request).await?;
//!         tracing::debug!(elapsed_ms = ctx.elapsed().as_millis() as u64, "handled");
//!         Ok(response)
//!     })
//! }
//!
//! let pipeline = Pipeline::new(vec![Arc::new(FnMiddleware::new("timing", timing))]);
//! ```

mod middleware;
mod pipeline;
pub mod stages;

pub use middleware::{BoxedMiddleware, FnMiddleware, Middleware, Next};
pub use pipeline::Pipeline;
