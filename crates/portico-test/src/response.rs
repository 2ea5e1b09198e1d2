//! Test response wrapper.

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode};
use http_body_util::BodyExt;
use portico_core::Response;
use serde::de::DeserializeOwned;

use crate::error::TestError;

/// A collected response with helper methods for assertions.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Collects an HTTP response into a [`TestResponse`].
    ///
    /// # Errors
    ///
    /// Returns `TestError::BodyRead` if the body cannot be collected.
    pub async fn from_http(response: Response) -> Result<Self, TestError> {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TestError::BodyRead(e.to_string()))?
            .to_bytes();

        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns a reference to the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value by name.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Gets a header value as a string.
    #[must_use]
    pub fn header_str(&self, name: impl AsRef<str>) -> Option<&str> {
        self.header(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    ///
    /// # Errors
    ///
    /// Returns `TestError::BodyRead` if the body is not valid UTF-8.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `TestError::Json` if deserialization fails.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        serde_json::from_slice(&self.body).map_err(TestError::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use portico_core::{Response, ResponseExt};

    #[tokio::test]
    async fn test_collects_status_headers_and_body() {
        let mut response: Response = http::Response::builder()
            .status(StatusCode::CREATED)
            .body(Full::new(Bytes::from_static(b"{\"id\":7}")))
            .unwrap();
        response
            .headers_mut()
            .insert("x-request-id", HeaderValue::from_static("abc"));

        let collected = TestResponse::from_http(response).await.unwrap();
        assert_eq!(collected.status_code(), 201);
        assert_eq!(collected.header_str("x-request-id"), Some("abc"));
        let body: serde_json::Value = collected.json().unwrap();
        assert_eq!(body["id"], 7);
    }

    #[tokio::test]
    async fn test_empty_body() {
        let response = Response::empty(StatusCode::NO_CONTENT);
        let collected = TestResponse::from_http(response).await.unwrap();
        assert!(collected.body().is_empty());
        assert_eq!(collected.text().unwrap(), "");
    }
}
