use super::handle::Future;
use super::shared::Shared;
use crate::error::Error;
use crate::task;
use crate::time;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Write side of a single-assignment cell.
///
/// Exactly one of [`complete`](Self::complete) and
/// [`complete_error`](Self::complete_error) may be called over the
/// lifetime of the cell, across all clones of the completer.
pub struct Completer<T> {
    future: Future<T>,
    timeout: Option<Duration>,
}

impl<T> Clone for Completer<T> {
    fn clone(&self) -> Self {
        Self {
            future: self.future.clone(),
            timeout: self.timeout,
        }
    }
}

impl<T> Completer<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a completer with a fresh pending future.
    pub fn new() -> Self {
        Self {
            future: Future {
                shared: Arc::new(Shared::pending()),
            },
            timeout: None,
        }
    }

    /// Creates a completer that fails itself with [`Error::Timeout`] if
    /// nothing completes it within `duration`.
    ///
    /// A completion that loses the race against the timer is ignored.
    ///
    /// # Panics
    ///
    /// Panics if called outside a runtime context.
    pub fn with_timeout(duration: Duration) -> Self {
        let completer = Self {
            timeout: Some(duration),
            ..Self::new()
        };

        let shared = completer.future.shared.clone();
        drop(task::spawn(async move {
            time::sleep(duration).await;
            if shared.settle(Err(Error::Timeout(duration))).is_ok() {
                tracing::debug!(?duration, "completer timed out");
            }
        }));

        completer
    }

    /// Completes the future with `value`.
    ///
    /// # Panics
    ///
    /// Panics if the future is already complete, unless it was failed by
    /// this completer's own timeout.
    pub fn complete(&self, value: T) {
        if self.future.shared.settle(Ok(value)).is_err() {
            self.already_completed();
        }
    }

    /// Fails the future with `err`.
    ///
    /// # Panics
    ///
    /// Same as [`complete`](Self::complete).
    pub fn complete_error(&self, err: Error) {
        if self.future.shared.settle(Err(err)).is_err() {
            self.already_completed();
        }
    }

    /// Completes the future unless it is already terminal.
    ///
    /// Returns whether this call decided the outcome.
    pub(crate) fn try_complete(&self, value: T) -> bool {
        self.future.shared.settle(Ok(value)).is_ok()
    }

    /// Fails the future unless it is already terminal.
    pub(crate) fn try_complete_error(&self, err: Error) -> bool {
        self.future.shared.settle(Err(err)).is_ok()
    }

    /// Returns `true` once the future is terminal.
    pub fn is_completed(&self) -> bool {
        self.future.is_completed()
    }

    /// Returns a handle to the future this completer settles.
    pub fn future(&self) -> Future<T> {
        self.future.clone()
    }

    fn already_completed(&self) {
        if self.timeout.is_some() && self.future.shared.timed_out() {
            tracing::debug!("completion arrived after timeout, ignoring");
            return;
        }

        panic!("future completed twice");
    }
}

impl<T> Default for Completer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Completer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("completed", &self.is_completed())
            .field("timeout", &self.timeout)
            .finish()
    }
}
