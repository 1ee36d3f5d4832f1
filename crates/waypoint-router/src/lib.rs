//! Waypoint Router
//!
//! Request routing on top of [`waypoint_core`]'s compressed trie:
//! - Route groups with shared path prefixes and middleware
//! - Flattened handler chains with a `next()`/`abort()` cursor
//! - Panic recovery around dispatch
//!
//! # Lifecycle
//!
//! Registration happens on a mutable [`Engine`]; [`Engine::freeze`] produces
//! an immutable [`Router`] that dispatches from any number of threads.
//!
//! # Example
//!
//! ```
//! use waypoint_router::{handler, Engine, Outcome};
//!
//! let mut engine = Engine::default();
//! engine.handle(
//!     "/hello/:name",
//!     vec![handler(|ctx| {
//!         let name = ctx.param("name").unwrap_or("world").to_string();
//!         ctx.set("greeting", format!("hello {name}"));
//!     })],
//! )?;
//!
//! let router = engine.freeze();
//! match router.serve("/hello/rust") {
//!     Outcome::Served(ctx) => {
//!         assert_eq!(ctx.get::<String>("greeting").map(String::as_str), Some("hello rust"));
//!     }
//!     Outcome::NotFound { .. } => unreachable!(),
//! }
//! # Ok::<(), waypoint_router::RouterError>(())
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod group;

pub use context::{handler, Handler, HandlerChain, RequestContext};
pub use engine::{Engine, EngineConfig, Outcome, Router};
pub use error::{Result, RouterError};
pub use group::Group;
