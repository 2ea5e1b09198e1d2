//! Extracted path parameters.

use smallvec::SmallVec;

/// Parameters extracted from a matched path.
///
/// Values are the raw path segments, with no type coercion. Most routes carry
/// one or two parameters, so pairs are stored inline on the stack and only
/// spill to the heap beyond four entries.
///
/// # Example
///
/// ```rust
/// use portico_router::Params;
///
/// let mut params = Params::new();
/// params.insert("id", "42");
///
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    pairs: SmallVec<[(String, String); 4]>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a parameter name to a raw path segment.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Returns the raw value bound to `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no parameters were bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over `(name, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut params = Params::new();
        params.insert("userId", "123");
        params.insert("postId", "456");

        assert_eq!(params.get("userId"), Some("123"));
        assert_eq!(params.get("postId"), Some("456"));
        assert_eq!(params.get("other"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_iter_preserves_binding_order() {
        let mut params = Params::new();
        params.insert("a", "1");
        params.insert("b", "2");

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_raw_values_not_coerced() {
        let mut params = Params::new();
        params.insert("id", "0042");
        assert_eq!(params.get("id"), Some("0042"));
    }

    #[test]
    fn test_spill_past_inline_capacity() {
        let mut params = Params::new();
        for i in 0..8 {
            params.insert(format!("k{i}"), format!("v{i}"));
        }
        assert_eq!(params.len(), 8);
        assert_eq!(params.get("k7"), Some("v7"));
    }
}
