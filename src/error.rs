//! Unified error type.

use std::fmt;

/// The error type returned by every stage of a handler chain.
///
/// Only [`Error::InvalidArgument`] is raised by the logging handlers
/// themselves, and only while a handler is being built. Transport failures
/// and cancellation come from further down the chain and travel back to the
/// caller untouched.
#[derive(Debug)]
pub enum Error {
    /// A required argument was missing or unusable. Names the argument.
    InvalidArgument(&'static str),
    /// The transport at the end of the chain failed.
    Transport(Box<dyn std::error::Error + Send + Sync>),
    /// The request was cancelled through its cancellation token.
    Cancelled,
}

impl Error {
    /// Wraps any transport-level failure.
    pub fn transport(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(e.into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(name) => write!(f, "invalid argument: {name}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Cancelled => f.write_str("request cancelled"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<hyper_util::client::legacy::Error> for Error {
    fn from(e: hyper_util::client::legacy::Error) -> Self {
        Self::transport(e)
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Self::transport(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Self::transport(e)
    }
}
