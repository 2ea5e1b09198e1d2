//! Route endpoints.

use portico_core::BoxHandler;
use portico_middleware::BoxedMiddleware;

/// What a route resolves to: a terminal handler plus any route-specific
/// middleware that runs after the global pipeline.
pub struct Endpoint {
    pub(crate) handler: BoxHandler,
    pub(crate) stages: Vec<BoxedMiddleware>,
}

impl Endpoint {
    /// Creates an endpoint with no route-specific middleware.
    #[must_use]
    pub fn new(handler: BoxHandler) -> Self {
        Self {
            handler,
            stages: Vec::new(),
        }
    }

    /// Creates an endpoint wrapped by route-specific middleware, in
    /// execution order.
    #[must_use]
    pub fn with_stages(handler: BoxHandler, stages: Vec<BoxedMiddleware>) -> Self {
        Self { handler, stages }
    }

    /// Returns the names of the route-specific stages.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}
