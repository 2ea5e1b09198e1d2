//! The handler signature.
//!
//! Handlers are the sole coupling point between the dispatch core and the
//! actual request handlers (users, files, cache, AI, ...), which this crate
//! treats as opaque. A handler receives the request context, the inbound
//! request, and the path parameters extracted by the router, and returns a
//! response or an error that propagates to the dispatcher boundary.

use portico_router::Params;
use std::future::Future;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::error::PorticoResult;
use crate::types::{BoxFuture, Request, Response};

/// The future returned by a handler.
///
/// `'static` by design: the handler reads what it needs from the context
/// synchronously and moves the request and parameters into the future, so the
/// context borrow ends before the await point.
pub type HandlerFuture = BoxFuture<'static, PorticoResult<Response>>;

/// A type-erased, shareable handler.
pub type BoxHandler =
    Arc<dyn Fn(&mut RequestContext, Request, Params) -> HandlerFuture + Send + Sync + 'static>;

/// Wraps an async function as a [`BoxHandler`].
///
/// # Example
///
/// ```rust
/// use portico_core::{handler_fn, Response, ResponseExt};
/// use http::StatusCode;
///
/// let handler = handler_fn(|_ctx, _req, params| {
///     let id = params.get("id").unwrap_or("unknown").to_string();
///     async move { Ok(Response::json(StatusCode::OK, &serde_json::json!({ "id": id }))) }
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> BoxHandler
where
    F: Fn(&mut RequestContext, Request, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PorticoResult<Response>> + Send + 'static,
{
    Arc::new(move |ctx, request, params| Box::pin(f(ctx, request, params)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseExt;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;

    fn empty_request(path: &str) -> Request {
        http::Request::builder()
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_handler_fn_invocation() {
        let handler = handler_fn(|ctx, _req, params| {
            let request_id = ctx.request_id().to_string();
            let id = params.get("id").map(str::to_string);
            async move {
                assert!(!request_id.is_empty());
                assert_eq!(id.as_deref(), Some("7"));
                Ok(Response::empty(StatusCode::NO_CONTENT))
            }
        });

        let mut ctx = RequestContext::new();
        let mut params = Params::new();
        params.insert("id", "7");

        let response = handler(&mut ctx, empty_request("/users/7"), params)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_handler_errors_propagate() {
        let handler = handler_fn(|_ctx, _req, _params| async {
            Err(crate::PorticoError::internal("handler blew up"))
        });

        let mut ctx = RequestContext::new();
        let result = handler(&mut ctx, empty_request("/"), Params::new()).await;
        assert!(result.is_err());
    }
}
