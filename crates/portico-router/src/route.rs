//! Route records and pattern segments.

use http::Method;

use crate::params::Params;

/// A single segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Must be byte-equal to the path segment.
    Literal(String),
    /// Matches any single path segment and binds it under the given name.
    Param(String),
}

/// An immutable registered route.
///
/// A route pairs an HTTP method and a slash-delimited pattern with an opaque
/// endpoint payload. Patterns are parsed into segments once at registration;
/// matching never re-parses them. Leading, trailing, and repeated slashes in
/// both patterns and paths are insignificant.
#[derive(Debug, Clone)]
pub struct Route<H> {
    method: Method,
    pattern: String,
    segments: Vec<Segment>,
    endpoint: H,
}

/// Splits a pattern or path into non-empty segments.
pub(crate) fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

impl<H> Route<H> {
    /// Parses `pattern` and creates a route.
    ///
    /// Segments starting with `:` are named parameters; everything else is a
    /// literal. The pattern structure is fixed from this point on.
    pub fn new(method: Method, pattern: impl Into<String>, endpoint: H) -> Self {
        let pattern = pattern.into();
        let segments = split_segments(&pattern)
            .map(|s| {
                s.strip_prefix(':').map_or_else(
                    || Segment::Literal(s.to_string()),
                    |name| Segment::Param(name.to_string()),
                )
            })
            .collect();
        Self {
            method,
            pattern,
            segments,
            endpoint,
        }
    }

    /// Returns the route's HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the original pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the endpoint payload.
    #[must_use]
    pub fn endpoint(&self) -> &H {
        &self.endpoint
    }

    /// Matches `path` against this route's pattern, ignoring the method.
    ///
    /// Returns the bound parameters on a match. A pattern only matches paths
    /// with the same number of non-empty segments.
    pub(crate) fn match_path(&self, path: &str) -> Option<Params> {
        let mut params = Params::new();
        let mut path_segments = split_segments(path);

        for segment in &self.segments {
            let part = path_segments.next()?;
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => params.insert(name.clone(), part),
            }
        }

        // Path must not have more segments than the pattern.
        if path_segments.next().is_some() {
            return None;
        }

        Some(params)
    }
}
