//! Per-request dispatch state
//!
//! A [`RequestContext`] carries one request through its handler chain: the
//! raw path, the matched pattern, the captured parameter bindings, a typed
//! key/value store for passing data between handlers, and the chain cursor.
//!
//! Handlers advance the chain by calling [`RequestContext::next`] and cut it
//! short with [`RequestContext::abort`]. A handler that does neither simply
//! returns and the cursor moves on, so middleware can wrap downstream
//! handlers (work, `next()`, more work) or stay passive.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use waypoint_core::Params;

/// A single route handler or middleware step.
pub type Handler = Arc<dyn Fn(&mut RequestContext) + Send + Sync>;

/// The flattened handler sequence stored as a route's payload.
pub type HandlerChain = Arc<[Handler]>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut RequestContext) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// State for one dispatched request.
pub struct RequestContext {
    path: String,
    pattern: String,
    params: Vec<(String, String)>,
    handlers: HandlerChain,
    /// Chain cursor; -1 until dispatch begins.
    index: isize,
    aborted: bool,
    keys: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl RequestContext {
    pub(crate) fn new(path: &str, pattern: &str, params: &Params<'_, '_>, chain: HandlerChain) -> Self {
        Self {
            path: path.to_string(),
            pattern: pattern.to_string(),
            params: params
                .iter()
                .map(|p| (p.key.to_string(), p.value.to_string()))
                .collect(),
            handlers: chain,
            index: -1,
            aborted: false,
            keys: HashMap::new(),
        }
    }

    /// The request path as dispatched.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The registered pattern that matched, e.g. `/users/:id`.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Value captured for the named parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All captured bindings in path order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Run the remaining handlers in order.
    ///
    /// Called by the router to start the chain, and by middleware to run
    /// everything downstream before resuming its own work. Each handler runs
    /// at most once per request regardless of how many `next` calls it is
    /// nested under.
    pub fn next(&mut self) {
        self.index += 1;
        while !self.aborted && self.index >= 0 && (self.index as usize) < self.handlers.len() {
            let step = Arc::clone(&self.handlers[self.index as usize]);
            step(self);
            self.index += 1;
        }
    }

    /// Stop the chain: no handler after the current one will run, whatever
    /// the chain's length.
    pub fn abort(&mut self) {
        self.aborted = true;
        self.index = self.handlers.len() as isize;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Store a typed value under `key` for later handlers (or the caller).
    pub fn set<V: Any + Send + Sync>(&mut self, key: impl Into<String>, value: V) {
        self.keys.insert(key.into(), Box::new(value));
    }

    /// Fetch a value stored by an earlier handler, if the type matches.
    pub fn get<V: Any + Send + Sync>(&self, key: &str) -> Option<&V> {
        self.keys.get(key).and_then(|v| v.downcast_ref())
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("path", &self.path)
            .field("pattern", &self.pattern)
            .field("params", &self.params)
            .field("handlers", &self.handlers.len())
            .field("index", &self.index)
            .field("aborted", &self.aborted)
            .finish_non_exhaustive()
    }
}
