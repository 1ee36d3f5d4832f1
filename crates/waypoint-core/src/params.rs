//! Parameter capture buffer
//!
//! Lookup records parameter *values* positionally while it walks the tree;
//! the matching names are only known once a terminal node is reached, at
//! which point they are zipped over the captured values in order. Both sides
//! are borrowed slices: keys point into the tree's stored name lists, values
//! point into the request path.

/// A single captured `name = value` binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param<'k, 'v> {
    /// Parameter name from the matched pattern (e.g. `id` for `:id`).
    pub key: &'k str,
    /// Captured text from the request path.
    pub value: &'v str,
}

/// Caller-supplied, order-preserving capture buffer.
///
/// Size it with [`Params::with_capacity`] using
/// [`RouteTree::max_params`](crate::RouteTree::max_params) so a lookup never
/// reallocates. The buffer is cleared at the start of every lookup and can
/// be reused across calls within a borrow scope.
#[derive(Debug, Default, Clone)]
pub struct Params<'k, 'v> {
    items: Vec<Param<'k, 'v>>,
}

impl<'k, 'v> Params<'k, 'v> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create a buffer that can hold `capacity` bindings without growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Value of the first binding named `name`, if any.
    pub fn get(&self, name: &str) -> Option<&'v str> {
        self.items.iter().find(|p| p.key == name).map(|p| p.value)
    }

    /// Bindings in capture order.
    pub fn iter(&self) -> impl Iterator<Item = &Param<'k, 'v>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Push a captured value; its key is filled in on match completion.
    pub(crate) fn push_value(&mut self, value: &'v str) {
        self.items.push(Param { key: "", value });
    }

    /// Drop the most recent capture, returning the byte length of its value
    /// (the amount the search offset must rewind by).
    pub(crate) fn pop_value(&mut self) -> usize {
        self.items.pop().map(|p| p.value.len()).unwrap_or(0)
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Zip the terminal node's name list over the captured values.
    pub(crate) fn set_keys(&mut self, names: &'k [String]) {
        for (param, name) in self.items.iter_mut().zip(names) {
            param.key = name;
        }
    }
}

impl<'a, 'k, 'v> IntoIterator for &'a Params<'k, 'v> {
    type Item = &'a Param<'k, 'v>;
    type IntoIter = std::slice::Iter<'a, Param<'k, 'v>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_rewind() {
        let mut params = Params::with_capacity(4);
        params.push_value("alpha");
        params.push_value("b");
        assert_eq!(params.len(), 2);
        assert_eq!(params.pop_value(), 1);
        assert_eq!(params.pop_value(), 5);
        assert_eq!(params.pop_value(), 0);
        assert!(params.is_empty());
    }

    #[test]
    fn test_keys_zipped_in_order() {
        let names = vec!["tool".to_string(), "sub".to_string()];
        let mut params = Params::new();
        params.push_value("test");
        params.push_value("3");
        params.set_keys(&names);
        assert_eq!(params.get("tool"), Some("test"));
        assert_eq!(params.get("sub"), Some("3"));
        assert_eq!(params.get("missing"), None);
    }
}
