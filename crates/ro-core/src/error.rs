use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Registration targeted a scope that does not declare or inherit the
    /// named function. Non-fatal; no record is created or modified.
    #[error("failed to set override for {scope}::{function}, the method does not exist")]
    MethodNotFound { scope: String, function: String },
    /// The stored computation could not be bound to its receiver or could
    /// not accept the forwarded arguments.
    #[error("cannot use override value set for {function} as a function: {reason}")]
    InvocationSetup { function: String, reason: String },
    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = result::Result<T, Error>;

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Generic(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
