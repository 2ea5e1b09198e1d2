//! Test utilities for the Portico dispatch core.
//!
//! Provides an ergonomic request builder, a response wrapper with assertion
//! helpers, and an in-memory [`MemoryCounterStore`] with failure injection
//! for exercising rate limit behavior without a real KV backend.
//!
//! # Example
//!
//! ```ignore
//! use portico_test::{TestRequest, TestResponse};
//!
//! let request = TestRequest::get("/users/42")
//!     .header("origin", "https://app.example.com")
//!     .build();
//! let response = TestResponse::from_http(dispatcher.dispatch(request).await).await?;
//! assert_eq!(response.status_code(), 200);
//! ```

mod error;
mod request;
mod response;
mod store;

pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
pub use store::MemoryCounterStore;
