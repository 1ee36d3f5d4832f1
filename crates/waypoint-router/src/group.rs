//! Route groups
//!
//! A [`Group`] scopes registrations under a shared path prefix and a shared
//! middleware stack. Groups are a build-phase convenience only: every
//! registration is flattened into an absolute pattern plus a combined chain
//! before it reaches the tree, so the serve phase never knows groups existed.

use crate::context::Handler;
use crate::engine::Engine;
use crate::error::Result;

/// A scoped view of an [`Engine`] for registering related routes.
///
/// Created by [`Engine::group`] or [`Group::group`]. Borrows the engine
/// mutably, so finish one group before opening a sibling.
pub struct Group<'e> {
    engine: &'e mut Engine,
    base_path: String,
    handlers: Vec<Handler>,
}

impl<'e> Group<'e> {
    pub(crate) fn new(engine: &'e mut Engine, base_path: String, handlers: Vec<Handler>) -> Self {
        Self {
            engine,
            base_path,
            handlers,
        }
    }

    /// Append middleware that runs before the handlers of every route
    /// registered through this group from now on.
    pub fn use_middleware(&mut self, middleware: Handler) -> &mut Self {
        self.handlers.push(middleware);
        self
    }

    /// Register `relative_path` (joined onto this group's base) with the
    /// group middleware prepended to `handlers`.
    pub fn handle(&mut self, relative_path: &str, handlers: Vec<Handler>) -> Result<&mut Self> {
        let absolute = join_paths(&self.base_path, relative_path);
        let combined = self.engine.combine(&self.handlers, handlers, &absolute)?;
        self.engine.register(absolute, combined)?;
        Ok(self)
    }

    /// Open a child group. It inherits this group's base path and middleware
    /// and adds its own on top.
    pub fn group(&mut self, relative_path: &str) -> Group<'_> {
        let base_path = join_paths(&self.base_path, relative_path);
        let handlers = self.handlers.clone();
        Group::new(self.engine, base_path, handlers)
    }
}

/// Join a relative path onto an absolute base.
///
/// The joined path is cleaned (duplicate slashes collapsed, `.` and `..`
/// segments resolved) except that a trailing slash on the relative path is
/// preserved, because `/doc` and `/doc/` are distinct routes.
pub(crate) fn join_paths(absolute: &str, relative: &str) -> String {
    if relative.is_empty() {
        return absolute.to_string();
    }
    let joined = clean(&format!("{absolute}/{relative}"));
    if relative.ends_with('/') && !joined.ends_with('/') {
        return joined + "/";
    }
    joined
}

fn clean(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return "/".to_string();
    }
    let mut cleaned = String::with_capacity(path.len());
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    cleaned
}
