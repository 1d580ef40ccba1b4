//! Error types.
//!
//! [`Error`] is the domain error carried by failed futures. It is cheap to
//! clone so the same failure can be handed to every error continuation
//! registered on a future.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// A domain error carried by a failed [`Future`](crate::Future).
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A timeout completer fired before anything else completed it.
    #[error("future timed out after {0:?}")]
    Timeout(Duration),

    /// The stream closed before the awaited element arrived.
    #[error("stream closed before an element arrived")]
    StreamClosed,

    /// A reactor already has a handler for the classifier.
    #[error("a handler is already registered for this classifier")]
    HandlerExists,

    /// Any other failure, supplied by the producer.
    #[error(transparent)]
    Custom(Arc<dyn StdError + Send + Sync>),
}

impl Error {
    /// Wraps an arbitrary error.
    pub fn custom<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::Custom(Arc::from(err.into()))
    }

    /// Creates an error from a message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::custom(message.to_string())
    }

    /// Returns `true` for errors produced by a timeout completer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Invalid runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The worker thread count is not a positive integer.
    #[error("worker thread count must be a positive integer (got {value:?})")]
    InvalidWorkerThreads { value: String },
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
