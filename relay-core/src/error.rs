use thiserror::Error;

/// Top-level error for the relay: platform calls, commands and route persistence.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    #[error("Delete error: {0}")]
    Delete(String),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Store error: {0}")]
    Store(String),
}

/// Errors produced while parsing or executing chat commands. Rendered back to the invoking channel.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("No route with key {0}")]
    RouteNotFound(String),

    #[error("Command only works inside a server")]
    NotInServer,
}

pub type Result<T> = std::result::Result<T, RelayError>;
