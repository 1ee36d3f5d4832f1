//! Router error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("route error: {0}")]
    Route(#[from] waypoint_core::Error),

    #[error("no handlers registered for '{0}'")]
    EmptyHandlerChain(String),

    #[error("handler chain too long: {count} handlers (max {max})")]
    TooManyHandlers { count: usize, max: usize },
}
