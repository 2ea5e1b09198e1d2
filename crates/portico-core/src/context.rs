//! Per-request context.
//!
//! A [`RequestContext`] is created once per inbound request by the dispatcher
//! and passed by reference through the middleware pipeline into the handler.
//! It is never persisted beyond the invocation.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps request IDs useful for log
/// correlation and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parses a request ID from a header value supplied by an upstream
    /// service. Returns `None` if the value is not a valid UUID.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-invocation state carried through the pipeline.
///
/// The inbound request itself travels alongside the context through the
/// pipeline; the context carries everything else: the request ID, timing,
/// and the host runtime's opaque bindings (environment object, execution
/// handle) stored as type-keyed extensions.
#[derive(Debug)]
pub struct RequestContext {
    request_id: RequestId,
    started_at: Instant,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RequestContext {
    /// Creates a context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a specific request ID, e.g. one propagated
    /// from an `x-request-id` header.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns how long this request has been in flight.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores a value in the context, keyed by its type.
    ///
    /// This is how the host runtime's bindings and any middleware-produced
    /// state reach the handler. Storing a second value of the same type
    /// replaces the first.
    pub fn insert_extension<T: Any + Send + Sync>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a previously stored value by type.
    #[must_use]
    pub fn extension<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    /// Removes and returns a previously stored value by type.
    pub fn remove_extension<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok())
            .map(|boxed| *boxed)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
