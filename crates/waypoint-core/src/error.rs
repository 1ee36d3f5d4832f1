//! Error types for route registration

use thiserror::Error;

/// Result type alias for waypoint-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Registration-time errors.
///
/// Lookup misses are not errors; they are reported through
/// [`Lookup::NotFound`](crate::Lookup::NotFound), with or without a
/// trailing-slash redirect hint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Pattern string was empty
    #[error("empty route pattern")]
    EmptyPattern,

    /// Pattern did not start with `/`
    #[error("route pattern must begin with '/': '{0}'")]
    NoLeadingSlash(String),

    /// A `:` or `*` marker with no name behind it
    #[error("wildcards must be named with a non-empty name in pattern '{0}'")]
    EmptyWildcardName(String),

    /// More than one `:`/`*` marker between two `/` boundaries
    #[error("only one wildcard per path segment is allowed in pattern '{0}'")]
    MultipleWildcards(String),

    /// A `*` marker followed by further segments
    #[error("catch-all routes are only allowed at the end of pattern '{0}'")]
    CatchAllMidPattern(String),

    /// A `*` marker not immediately preceded by `/`
    #[error("no '/' before catch-all in pattern '{0}'")]
    CatchAllWithoutSlash(String),

    /// The exact pattern already owns a route payload
    #[error("a route is already registered for pattern '{0}'")]
    DuplicateRoute(String),
}
