//! Waypoint Core
//!
//! Compressed-trie (radix tree) storage and matching for route patterns.
//!
//! Patterns are `/`-rooted strings built from three segment forms:
//!
//! ```text
//! /users/all            static text
//! /users/:id            named parameter, matches one segment
//! /assets/*filepath     catch-all, matches the whole remainder
//! ```
//!
//! This crate provides:
//! - Pattern validation and decomposition ([`pattern`])
//! - The mutable build-phase tree ([`TreeBuilder`])
//! - The frozen, read-only lookup tree ([`RouteTree`])
//! - The caller-supplied parameter capture buffer ([`Params`])
//!
//! # Two-phase lifecycle
//!
//! Registration and lookup never interleave. Build the tree single-threaded
//! through [`TreeBuilder`], then [`TreeBuilder::freeze`] it into a
//! [`RouteTree`] that any number of threads may read concurrently. Lookup is
//! synchronous, performs no I/O, and allocates nothing beyond the capture
//! buffer the caller passes in.

pub mod error;
pub mod params;
pub mod pattern;
pub mod tree;

pub use error::{Error, Result};
pub use params::{Param, Params};
pub use tree::{Kind, Lookup, RouteTree, TreeBuilder};
