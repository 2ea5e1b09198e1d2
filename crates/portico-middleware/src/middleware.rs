//! The middleware trait and continuation type.

use portico_core::{BoxFuture, BoxHandler, PorticoResult, Request, RequestContext, Response};
use portico_router::Params;
use std::sync::Arc;

/// A request interceptor in the dispatch pipeline.
///
/// A middleware receives the request context, the inbound request, and a
/// [`Next`] continuation. It must produce a response one of three ways:
///
/// - call `next.run(...)` and return (possibly after rewriting) its result;
/// - return early without calling `next` (short-circuit) — nothing downstream
///   runs;
/// - return an error, which propagates untouched to the dispatcher boundary.
///
/// Middleware must not swallow downstream errors unless that is its explicit,
/// documented purpose, since downstream stages may rely on propagation.
pub trait Middleware: Send + Sync + 'static {
    /// The stage name, used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request.
    fn handle<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, PorticoResult<Response>>;
}

/// A shareable, type-erased middleware.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// The continuation handed to each middleware.
///
/// Consumed by [`Next::run`], so it can be invoked at most once. Dropping it
/// without calling `run` is the short-circuit case.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// More middleware downstream.
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    /// End of the chain: the terminal handler with its extracted parameters.
    Handler {
        handler: &'a BoxHandler,
        params: Params,
    },
}

impl<'a> Next<'a> {
    /// Wraps the continuation with one more middleware.
    pub(crate) fn chain(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates the terminal continuation that invokes the handler.
    #[must_use]
    pub fn handler(handler: &'a BoxHandler, params: Params) -> Self {
        Self {
            inner: NextInner::Handler { handler, params },
        }
    }

    /// Invokes the next middleware or the terminal handler.
    pub async fn run(
        self,
        ctx: &mut RequestContext,
        request: Request,
    ) -> PorticoResult<Response> {
        match self.inner {
            NextInner::Chain { middleware, next } => {
                middleware.handle(ctx, request, *next).await
            }
            NextInner::Handler { handler, params } => handler(ctx, request, params).await,
        }
    }
}

/// A middleware defined by a function.
///
/// Because the returned future may borrow the context, the function must
/// return a [`BoxFuture`] explicitly. Plain `fn` items coerce without
/// annotation trouble:
///
/// ```ignore
/// fn reject_anonymous<'a>(
///     ctx: &'a mut RequestContext,
///     request: Request,
///     next: Next<'a>,
/// ) -> BoxFuture<'a, PorticoResult<Response>> {
///     Box::pin(async move {
///         if request.headers().get("authorization").is_none() {
///             return Err(PorticoError::unauthorized("missing credentials"));
///         }
///         next.run(ctx, request).await
///     })
/// }
///
/// let middleware = FnMiddleware::new("auth", reject_anonymous);
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a named function middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(
            &'a mut RequestContext,
            Request,
            Next<'a>,
        ) -> BoxFuture<'a, PorticoResult<Response>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, PorticoResult<Response>> {
        (self.func)(ctx, request, next)
    }
}
