//! Test request building.

use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use http_body_util::Full;
use portico_core::Request;
use serde::Serialize;

/// Entry points for building test requests.
pub struct TestRequest;

impl TestRequest {
    /// Creates a new GET request builder.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Creates a new POST request builder.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Creates a new PUT request builder.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Creates a new PATCH request builder.
    pub fn patch(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PATCH, uri)
    }

    /// Creates a new DELETE request builder.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }

    /// Creates a new OPTIONS request builder.
    pub fn options(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::OPTIONS, uri)
    }
}

/// Builder for constructing test requests.
#[must_use]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Sets a header on the request.
    ///
    /// # Panics
    ///
    /// Panics if the name or value is not a valid header. Test-only code.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref()).expect("valid header name");
        let value = HeaderValue::try_from(value.as_ref()).expect("valid header value");
        self.headers.insert(name, value);
        self
    }

    /// Sets the `Origin` header.
    pub fn origin(self, origin: impl AsRef<str>) -> Self {
        self.header(header::ORIGIN.as_str(), origin)
    }

    /// Sets a raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and the matching `Content-Type`.
    ///
    /// # Panics
    ///
    /// Panics if serialization fails. Test-only code.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        self.body = Bytes::from(serde_json::to_vec(value).expect("serializable body"));
        self.header(header::CONTENT_TYPE.as_str(), "application/json")
    }

    /// Builds the HTTP request.
    ///
    /// # Panics
    ///
    /// Panics if the URI is invalid. Test-only code.
    pub fn build(self) -> Request {
        let mut builder = http::Request::builder().method(self.method).uri(self.uri);

        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        builder.body(Full::new(self.body)).expect("valid request")
    }
}
