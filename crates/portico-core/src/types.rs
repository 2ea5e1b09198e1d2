//! HTTP request/response aliases and helpers.
//!
//! The host runtime hands Portico one request per invocation and expects one
//! response back. Bodies are always fully buffered (`Full<Bytes>`); there is
//! no streaming in the dispatch core.

use bytes::Bytes;
use http::{header, StatusCode};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;

/// The HTTP request type flowing through the dispatch core.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type flowing through the dispatch core.
pub type Response = http::Response<Full<Bytes>>;

/// A boxed future, the form in which all dispatch-core async work is passed
/// around (middleware continuations, handler futures, store calls).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Helpers for building common responses.
pub trait ResponseExt {
    /// Builds a response with the given status and a JSON body.
    fn json(status: StatusCode, body: &serde_json::Value) -> Response;

    /// Builds an empty response with the given status.
    fn empty(status: StatusCode) -> Response;
}

impl ResponseExt for Response {
    fn json(status: StatusCode, body: &serde_json::Value) -> Response {
        // Serialization of serde_json::Value and these header values cannot
        // fail, so the builder cannot either.
        http::Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap_or_else(|_| unreachable!("static response parts are valid"))
    }

    fn empty(status: StatusCode) -> Response {
        http::Response::builder()
            .status(status)
            .body(Full::new(Bytes::new()))
            .unwrap_or_else(|_| unreachable!("static response parts are valid"))
    }
}
