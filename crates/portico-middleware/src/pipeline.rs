//! Pipeline composition.

use portico_core::{BoxHandler, PorticoResult, Request, RequestContext, Response};
use portico_router::Params;

use crate::middleware::{BoxedMiddleware, Next};

/// The ordered set of global middleware, composed per request with a route's
/// own middleware and terminal handler.
///
/// Given global stages `[g1, g2]`, route stages `[r1]`, and handler `h`, one
/// invocation is equivalent to `g1(g2(r1(h)))`: earlier stages wrap later
/// ones and may run logic both before and after downstream execution. Global
/// stages always precede route-specific stages.
///
/// The pipeline is built once at startup and read-only afterwards; the
/// per-request chain is assembled from borrows, so composing it allocates
/// only the continuation boxes.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
}

impl Pipeline {
    /// Creates a pipeline from the global stages, in execution order.
    #[must_use]
    pub fn new(stages: Vec<BoxedMiddleware>) -> Self {
        Self { stages }
    }

    /// Returns the number of global stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if there are no global stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs one request through `global stages → route stages → handler`.
    ///
    /// Errors from any stage or the handler propagate out unmodified; the
    /// caller (the dispatcher) is the single recovery point.
    pub async fn run(
        &self,
        route_stages: &[BoxedMiddleware],
        ctx: &mut RequestContext,
        request: Request,
        handler: &BoxHandler,
        params: Params,
    ) -> PorticoResult<Response> {
        // Assemble back to front so the first-registered stage is outermost.
        let mut next = Next::handler(handler, params);
        for stage in route_stages.iter().rev() {
            next = Next::chain(stage.as_ref(), next);
        }
        for stage in self.stages.iter().rev() {
            next = Next::chain(stage.as_ref(), next);
        }
        next.run(ctx, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::FnMiddleware;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;
    use portico_core::{handler_fn, BoxFuture, PorticoError, ResponseExt};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn empty_request() -> Request {
        http::Request::builder()
            .uri("/test")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    /// A stage that records its name before and after downstream execution.
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl crate::Middleware for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn handle<'a>(
            &'a self,
            ctx: &'a mut RequestContext,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, PorticoResult<Response>> {
            Box::pin(async move {
                self.log.lock().unwrap().push(format!("{}:pre", self.name));
                let response = next.run(ctx, request).await;
                self.log.lock().unwrap().push(format!("{}:post", self.name));
                response
            })
        }
    }

    #[tokio::test]
    async fn test_stages_wrap_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let global: Vec<BoxedMiddleware> = vec![
            Arc::new(Recorder {
                name: "g1",
                log: log.clone(),
            }),
            Arc::new(Recorder {
                name: "g2",
                log: log.clone(),
            }),
        ];
        let route: Vec<BoxedMiddleware> = vec![Arc::new(Recorder {
            name: "r1",
            log: log.clone(),
        })];

        let handler_log = log.clone();
        let handler = handler_fn(move |_ctx, _req, _params| {
            handler_log.lock().unwrap().push("handler".to_string());
            async { Ok(Response::empty(StatusCode::OK)) }
        });

        let pipeline = Pipeline::new(global);
        let mut ctx = RequestContext::new();
        let response = pipeline
            .run(&route, &mut ctx, empty_request(), &handler, Params::new())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["g1:pre", "g2:pre", "r1:pre", "handler", "r1:post", "g2:post", "g1:post"]
        );
    }

    #[tokio::test]
    async fn test_short_circuit_stops_downstream_stages() {
        fn halt<'a>(
            _ctx: &'a mut RequestContext,
            _request: Request,
            _next: Next<'a>,
        ) -> BoxFuture<'a, PorticoResult<Response>> {
            Box::pin(async move { Ok(Response::empty(StatusCode::FORBIDDEN)) })
        }

        struct Counting {
            calls: Arc<AtomicUsize>,
        }

        impl crate::Middleware for Counting {
            fn name(&self) -> &'static str {
                "counting"
            }

            fn handle<'a>(
                &'a self,
                ctx: &'a mut RequestContext,
                request: Request,
                next: Next<'a>,
            ) -> BoxFuture<'a, PorticoResult<Response>> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                Box::pin(async move { next.run(ctx, request).await })
            }
        }

        let downstream_calls = Arc::new(AtomicUsize::new(0));
        let counting = Counting {
            calls: downstream_calls.clone(),
        };

        let global: Vec<BoxedMiddleware> =
            vec![Arc::new(FnMiddleware::new("halt", halt)), Arc::new(counting)];

        let handler_calls = Arc::new(AtomicUsize::new(0));
        let hc = handler_calls.clone();
        let handler = handler_fn(move |_ctx, _req, _params| {
            hc.fetch_add(1, Ordering::SeqCst);
            async { Ok(Response::empty(StatusCode::OK)) }
        });

        let pipeline = Pipeline::new(global);
        let mut ctx = RequestContext::new();
        let response = pipeline
            .run(&[], &mut ctx, empty_request(), &handler, Params::new())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(downstream_calls.load(Ordering::SeqCst), 0);
        assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_pipeline_goes_straight_to_handler() {
        let handler =
            handler_fn(|_ctx, _req, _params| async { Ok(Response::empty(StatusCode::OK)) });
        let pipeline = Pipeline::default();
        let mut ctx = RequestContext::new();
        let response = pipeline
            .run(&[], &mut ctx, empty_request(), &handler, Params::new())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_handler_error_passes_through_stages() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let global: Vec<BoxedMiddleware> = vec![Arc::new(Recorder {
            name: "outer",
            log: log.clone(),
        })];

        let handler = handler_fn(|_ctx, _req, _params| async {
            Err(PorticoError::internal("boom"))
        });

        let pipeline = Pipeline::new(global);
        let mut ctx = RequestContext::new();
        let result = pipeline
            .run(&[], &mut ctx, empty_request(), &handler, Params::new())
            .await;

        assert!(matches!(result, Err(PorticoError::Internal { .. })));
        // The stage still observed the error flow through it.
        assert_eq!(*log.lock().unwrap(), vec!["outer:pre", "outer:post"]);
    }

    #[test]
    fn test_stage_names() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::new(vec![
            Arc::new(Recorder {
                name: "a",
                log: log.clone(),
            }),
            Arc::new(Recorder {
                name: "b",
                log,
            }),
        ]);
        assert_eq!(pipeline.stage_names(), vec!["a", "b"]);
        assert_eq!(pipeline.len(), 2);
        assert!(!pipeline.is_empty());
    }
}
