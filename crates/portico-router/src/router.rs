//! Route registration and matching.

use http::Method;

use crate::params::Params;
use crate::route::Route;

/// An ordered list of routes with first-match-wins semantics.
///
/// The route list is built during an initialization phase (`route` calls) and
/// read-only thereafter; matching never mutates the router, so a fully
/// registered router can be shared freely across concurrent requests.
///
/// Registering two routes with an identical `(method, pattern)` pair is not
/// rejected, but the second can never be reached — the first registered route
/// wins under the matching algorithm.
#[derive(Debug, Clone)]
pub struct Router<H> {
    routes: Vec<Route<H>>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of matching a single `(method, path)` pair.
#[derive(Debug)]
pub enum MatchOutcome<'a, H> {
    /// A route matched on both pattern and method.
    Matched(RouteMatch<'a, H>),
    /// At least one route's pattern matches the path, but none with this
    /// method. Carries the matching methods for the `Allow` header, in
    /// registration order, deduplicated.
    MethodNotAllowed {
        /// Methods registered for patterns matching this path.
        allowed: Vec<Method>,
    },
    /// No registered pattern matches the path, for any method.
    NotFound,
}

impl<'a, H> MatchOutcome<'a, H> {
    /// Returns the match, discarding the negative outcomes.
    #[must_use]
    pub fn into_match(self) -> Option<RouteMatch<'a, H>> {
        match self {
            Self::Matched(m) => Some(m),
            _ => None,
        }
    }
}

/// A successful route match.
///
/// Ephemeral: borrows the route's endpoint for the duration of one request
/// and owns the parameters extracted from the path.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    /// The matched route's endpoint payload.
    pub endpoint: &'a H,
    /// The matched route's original pattern, for logging.
    pub pattern: &'a str,
    /// Parameters bound from the path.
    pub params: Params,
}

impl<H> Router<H> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a route. Order of registration is match priority.
    pub fn route(&mut self, method: Method, pattern: impl Into<String>, endpoint: H) {
        self.routes.push(Route::new(method, pattern, endpoint));
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over the registered routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route<H>> {
        self.routes.iter()
    }

    /// Matches a `(method, path)` pair against the registered routes.
    ///
    /// Routes are tried in registration order and the first route whose
    /// pattern and method both match wins. When only patterns match, the
    /// methods they are registered under are collected so the caller can
    /// emit an `Allow` header.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> MatchOutcome<'_, H> {
        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            let Some(params) = route.match_path(path) else {
                continue;
            };
            if route.method() == method {
                return MatchOutcome::Matched(RouteMatch {
                    endpoint: route.endpoint(),
                    pattern: route.pattern(),
                    params,
                });
            }
            if !allowed.contains(route.method()) {
                allowed.push(route.method().clone());
            }
        }

        if allowed.is_empty() {
            MatchOutcome::NotFound
        } else {
            MatchOutcome::MethodNotAllowed { allowed }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_registered_wins_on_duplicates() {
        let mut router = Router::new();
        router.route(Method::GET, "/users/:id", "first");
        router.route(Method::GET, "/users/:id", "second");

        let m = router
            .match_route(&Method::GET, "/users/1")
            .into_match()
            .unwrap();
        assert_eq!(*m.endpoint, "first");
    }

    #[test]
    fn test_allow_set_collects_all_matching_patterns() {
        let mut router = Router::new();
        router.route(Method::GET, "/things/:id", "get");
        router.route(Method::PUT, "/things/:id", "put");
        router.route(Method::DELETE, "/things/special", "del");

        match router.match_route(&Method::POST, "/things/special") {
            MatchOutcome::MethodNotAllowed { allowed } => {
                assert_eq!(allowed, vec![Method::GET, Method::PUT, Method::DELETE]);
            }
            other => panic!("expected MethodNotAllowed, got {other:?}"),
        }
    }

    #[test]
    fn test_allow_set_deduplicates() {
        let mut router = Router::new();
        router.route(Method::GET, "/a/:x", "one");
        router.route(Method::GET, "/a/b", "two");

        match router.match_route(&Method::POST, "/a/b") {
            MatchOutcome::MethodNotAllowed { allowed } => {
                assert_eq!(allowed, vec![Method::GET]);
            }
            other => panic!("expected MethodNotAllowed, got {other:?}"),
        }
    }

    #[test]
    fn test_match_is_idempotent() {
        let mut router = Router::new();
        router.route(Method::GET, "/users/:id", "getUser");

        let first = router.match_route(&Method::GET, "/users/9");
        let second = router.match_route(&Method::GET, "/users/9");

        let (a, b) = (first.into_match().unwrap(), second.into_match().unwrap());
        assert_eq!(a.endpoint, b.endpoint);
        assert_eq!(a.params, b.params);
        assert_eq!(a.pattern, b.pattern);
    }

    #[test]
    fn test_trailing_slash_matches() {
        let mut router = Router::new();
        router.route(Method::GET, "/users", "listUsers");

        assert!(router
            .match_route(&Method::GET, "/users/")
            .into_match()
            .is_some());
    }

    #[test]
    fn test_empty_router_is_not_found() {
        let router: Router<()> = Router::new();
        assert!(matches!(
            router.match_route(&Method::GET, "/anything"),
            MatchOutcome::NotFound
        ));
    }
}
