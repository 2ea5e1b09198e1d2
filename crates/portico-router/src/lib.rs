//! Registration-ordered path-pattern router for Portico.
//!
//! This crate matches `(method, path)` pairs against route patterns made of
//! literal and `:name` parameter segments. Unlike tree-based routers there is
//! no specificity scoring: routes are tried strictly in registration order and
//! the first full match wins. Registration order is therefore a de facto
//! priority — register literal routes before parameterized routes that would
//! otherwise shadow them.
//!
//! The router distinguishes two negative outcomes so callers can produce
//! correct status codes:
//!
//! - [`MatchOutcome::NotFound`]: no registered pattern matches the path (404).
//! - [`MatchOutcome::MethodNotAllowed`]: at least one pattern matches the
//!   path, but none with the request's method (405). The set of methods that
//!   do match is carried for the `Allow` header.
//!
//! # Example
//!
//! ```rust
//! use portico_router::{MatchOutcome, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.route(Method::GET, "/users/:id", "getUser");
//! router.route(Method::POST, "/users", "createUser");
//!
//! match router.match_route(&Method::GET, "/users/42") {
//!     MatchOutcome::Matched(m) => {
//!         assert_eq!(*m.endpoint, "getUser");
//!         assert_eq!(m.params.get("id"), Some("42"));
//!     }
//!     _ => panic!("expected a match"),
//! }
//! ```
//!
//! The endpoint payload is generic: the router itself does not know what a
//! handler is. Higher layers attach whatever per-route value they need
//! (a handler plus route-specific middleware, in the dispatcher's case).

mod params;
mod route;
mod router;

pub use params::Params;
pub use route::Route;
pub use router::{MatchOutcome, RouteMatch, Router};

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_basic_routing() {
        let mut router = Router::new();
        router.route(Method::GET, "/users", "listUsers");
        router.route(Method::GET, "/users/:id", "getUser");

        let m = router
            .match_route(&Method::GET, "/users")
            .into_match()
            .unwrap();
        assert_eq!(*m.endpoint, "listUsers");
        assert!(m.params.is_empty());

        let m = router
            .match_route(&Method::GET, "/users/123")
            .into_match()
            .unwrap();
        assert_eq!(*m.endpoint, "getUser");
        assert_eq!(m.params.get("id"), Some("123"));
    }

    #[test]
    fn test_registration_order_beats_specificity() {
        // The parameterized route is registered first, so it shadows the
        // literal route. First match wins; there is no specificity scoring.
        let mut router = Router::new();
        router.route(Method::GET, "/users/:id", "getUser");
        router.route(Method::GET, "/users/me", "getCurrentUser");

        let m = router
            .match_route(&Method::GET, "/users/me")
            .into_match()
            .unwrap();
        assert_eq!(*m.endpoint, "getUser");
        assert_eq!(m.params.get("id"), Some("me"));
    }

    #[test]
    fn test_not_found_vs_method_not_allowed() {
        let mut router = Router::new();
        router.route(Method::GET, "/users", "listUsers");
        router.route(Method::POST, "/users", "createUser");

        assert!(matches!(
            router.match_route(&Method::GET, "/posts"),
            MatchOutcome::NotFound
        ));

        match router.match_route(&Method::DELETE, "/users") {
            MatchOutcome::MethodNotAllowed { allowed } => {
                assert_eq!(allowed, vec![Method::GET, Method::POST]);
            }
            other => panic!("expected MethodNotAllowed, got {other:?}"),
        }
    }
}
