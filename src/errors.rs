// src/errors.rs

//! Crate-wide error types.
//!
//! - [`TimeboxError`] covers configuration and setup failures.
//! - [`BoundedError`] is the outcome error of a single bounded invocation:
//!   either the deadline won the race, or the wrapped operation failed on
//!   its own and its error is passed through untouched.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeboxError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown operation category: {0}")]
    UnknownCategory(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TimeboxError>;

/// Failure of a bounded operation.
///
/// `E` is whatever error the wrapped operation produces. The supervisor
/// never inspects or translates it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundedError<E> {
    /// The deadline elapsed before the operation settled.
    #[error("{0}")]
    Timeout(String),

    /// The operation itself failed.
    #[error("{0}")]
    Upstream(E),

    /// The caller's cancellation token fired before either side settled.
    #[error("operation cancelled")]
    Cancelled,

    /// A spawned operation panicked or was aborted by the runtime.
    #[error("operation task aborted: {0}")]
    Aborted(String),
}

impl<E> BoundedError<E> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BoundedError::Timeout(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, BoundedError::Cancelled)
    }

    /// The configured deadline message, if this is a timeout.
    pub fn timeout_message(&self) -> Option<&str> {
        match self {
            BoundedError::Timeout(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    /// Recover the operation's own error, if that is what this is.
    pub fn into_upstream(self) -> Option<E> {
        match self {
            BoundedError::Upstream(e) => Some(e),
            _ => None,
        }
    }

    pub fn map_upstream<F, U>(self, f: F) -> BoundedError<U>
    where
        F: FnOnce(E) -> U,
    {
        match self {
            BoundedError::Timeout(msg) => BoundedError::Timeout(msg),
            BoundedError::Upstream(e) => BoundedError::Upstream(f(e)),
            BoundedError::Cancelled => BoundedError::Cancelled,
            BoundedError::Aborted(reason) => BoundedError::Aborted(reason),
        }
    }
}
