//! Request logging stage.

use portico_core::{BoxFuture, PorticoResult, Request, RequestContext, Response};

use crate::middleware::{Middleware, Next};

/// Logs one line per request with method, path, status, and elapsed time.
///
/// Observes but never rewrites; errors flow through it to the dispatcher,
/// logged here at WARN so the failure is attributed to the right request even
/// though the response mapping happens further out.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceStage;

impl TraceStage {
    /// Creates the stage.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Middleware for TraceStage {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn handle<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, PorticoResult<Response>> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        Box::pin(async move {
            tracing::debug!(
                request_id = %ctx.request_id(),
                %method,
                %path,
                "request started"
            );

            let result = next.run(ctx, request).await;

            match &result {
                Ok(response) => {
                    tracing::info!(
                        request_id = %ctx.request_id(),
                        %method,
                        %path,
                        status = response.status().as_u16(),
                        elapsed_ms = ctx.elapsed().as_millis() as u64,
                        "request completed"
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        request_id = %ctx.request_id(),
                        %method,
                        %path,
                        elapsed_ms = ctx.elapsed().as_millis() as u64,
                        %error,
                        "request failed"
                    );
                }
            }

            result
        })
    }
}
