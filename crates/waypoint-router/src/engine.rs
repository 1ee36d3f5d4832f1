//! Engine (build phase) and Router (serve phase)
//!
//! The [`Engine`] is the registration façade: it owns the route tree
//! builder, the root middleware stack, and the limits. [`Engine::freeze`]
//! turns it into a [`Router`], after which the route table is immutable and
//! dispatch may run from any number of threads.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, trace, warn};
use waypoint_core::{Lookup, Params, RouteTree, TreeBuilder};

use crate::context::{Handler, HandlerChain, RequestContext};
use crate::error::{Result, RouterError};
use crate::group::{join_paths, Group};

/// Build-phase limits and hooks.
#[derive(Clone)]
pub struct EngineConfig {
    /// Capacity hint for per-request parameter buffers.
    pub max_params: usize,
    /// Upper bound on a flattened handler chain (group middleware included).
    pub max_handlers: usize,
    /// Invoked with the request context when a handler panics. Without one,
    /// panics unwind to the caller of `serve`.
    pub panic_handler: Option<Handler>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_params: 64,
            max_handlers: 63,
            panic_handler: None,
        }
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("max_params", &self.max_params)
            .field("max_handlers", &self.max_handlers)
            .field("panic_handler", &self.panic_handler.is_some())
            .finish()
    }
}

/// Route registration façade.
///
/// The engine is itself the root group: its base path is `/` and middleware
/// added with [`use_middleware`](Engine::use_middleware) runs before every
/// route's own handlers.
pub struct Engine {
    config: EngineConfig,
    builder: TreeBuilder<HandlerChain>,
    /// Root-group middleware.
    handlers: Vec<Handler>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            builder: TreeBuilder::new(),
            handlers: Vec::new(),
        }
    }

    /// Append root middleware; applies to routes registered from now on.
    pub fn use_middleware(&mut self, middleware: Handler) -> &mut Self {
        self.handlers.push(middleware);
        self
    }

    /// Register an absolute route pattern with its handlers. Root middleware
    /// is prepended to the chain.
    pub fn handle(&mut self, path: &str, handlers: Vec<Handler>) -> Result<&mut Self> {
        let absolute = join_paths("/", path);
        let combined = self.combine(&self.handlers, handlers, &absolute)?;
        self.register(absolute, combined)?;
        Ok(self)
    }

    /// Open a route group under `prefix`, inheriting the root middleware.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        let base_path = join_paths("/", prefix);
        let handlers = self.handlers.clone();
        Group::new(self, base_path, handlers)
    }

    /// Finalize registration into an immutable, shareable router.
    pub fn freeze(self) -> Router {
        let tree = self.builder.freeze();
        debug!(routes = tree.len(), "router frozen");
        Router {
            tree,
            max_params: self.config.max_params,
            panic_handler: self.config.panic_handler,
        }
    }

    pub(crate) fn combine(
        &self,
        base: &[Handler],
        extra: Vec<Handler>,
        pattern: &str,
    ) -> Result<Vec<Handler>> {
        if extra.is_empty() {
            return Err(RouterError::EmptyHandlerChain(pattern.to_string()));
        }
        let count = base.len() + extra.len();
        if count >= self.config.max_handlers {
            return Err(RouterError::TooManyHandlers {
                count,
                max: self.config.max_handlers,
            });
        }
        let mut combined = Vec::with_capacity(count);
        combined.extend(base.iter().cloned());
        combined.extend(extra);
        Ok(combined)
    }

    pub(crate) fn register(&mut self, pattern: String, chain: Vec<Handler>) -> Result<()> {
        let len = chain.len();
        self.builder.add_route(&pattern, HandlerChain::from(chain))?;
        debug!(pattern = %pattern, handlers = len, "route registered");
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Result of dispatching one request path.
#[derive(Debug)]
pub enum Outcome {
    /// A route matched and its chain ran; the context holds whatever the
    /// handlers left behind.
    Served(RequestContext),
    /// No route matched. `tsr` hints that the path with a trailing slash
    /// added or removed would have.
    NotFound { tsr: bool },
}

/// Frozen route table plus dispatch. `Send + Sync`; share by reference or
/// `Arc` across worker threads.
pub struct Router {
    tree: RouteTree<HandlerChain>,
    max_params: usize,
    panic_handler: Option<Handler>,
}

impl Router {
    /// Match `path` and run the matched chain to completion.
    pub fn serve(&self, path: &str) -> Outcome {
        let mut params = Params::with_capacity(self.max_params);
        match self.tree.find(path, &mut params) {
            Lookup::Found { value, pattern } => {
                trace!(path, pattern, "route matched");
                let mut ctx = RequestContext::new(path, pattern, &params, Arc::clone(value));
                self.run(&mut ctx);
                Outcome::Served(ctx)
            }
            Lookup::NotFound { tsr } => {
                trace!(path, tsr, "no route");
                Outcome::NotFound { tsr }
            }
        }
    }

    /// Match without dispatching, for callers that run handlers themselves.
    pub fn lookup<'t, 'p>(
        &'t self,
        path: &'p str,
        params: &mut Params<'t, 'p>,
    ) -> Lookup<'t, HandlerChain> {
        self.tree.find(path, params)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Largest parameter count across registered routes.
    pub fn max_params(&self) -> usize {
        self.tree.max_params()
    }

    fn run(&self, ctx: &mut RequestContext) {
        match &self.panic_handler {
            Some(recover) => {
                if catch_unwind(AssertUnwindSafe(|| ctx.next())).is_err() {
                    warn!(path = ctx.path(), "handler panicked, running panic handler");
                    recover(ctx);
                }
            }
            None => ctx.next(),
        }
    }
}
