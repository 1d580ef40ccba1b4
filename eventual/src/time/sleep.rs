use crate::driver::command::Command;
use crate::runtime::context::CURRENT_DRIVER;

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Creates a future that completes after the given duration.
///
/// # Panics
///
/// Panics if polled outside of a running runtime.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
///
/// sleep(Duration::from_millis(10)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep::new(duration)
}

/// A future that completes once a specific deadline is reached.
///
/// `Sleep` registers a timer with the driver on first poll. Dropping it
/// before completion cancels the timer, so an abandoned sleep never wakes
/// its task.
///
/// A duration too large to be represented as an [`Instant`] yields a
/// sleep that never completes.
pub struct Sleep {
    /// Absolute point in time when the sleep completes, `None` if it lies
    /// beyond what an `Instant` can represent.
    deadline: Option<Instant>,

    /// Whether the timer has already been registered with the driver.
    registered: bool,

    /// Cancellation flag shared with the driver.
    cancelled: Arc<AtomicBool>,
}

impl Sleep {
    /// Creates a new `Sleep` future that completes after `duration`.
    ///
    /// The timer is not registered until the future is first polled.
    pub(crate) fn new(duration: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(duration),
            registered: false,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns the instant at which this sleep completes, or `None` for
    /// a sleep that never does.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        let Some(deadline) = this.deadline else {
            return Poll::Pending;
        };

        if Instant::now() >= deadline {
            return Poll::Ready(());
        }

        if !this.registered {
            this.registered = true;

            CURRENT_DRIVER.with(|cell| {
                let binding = cell.borrow();
                let driver = binding.as_ref().expect("Sleep polled outside of runtime");

                let _ = driver.send(Command::SetTimer {
                    deadline,
                    waker: cx.waker().clone(),
                    cancelled: this.cancelled.clone(),
                });
            });
        }

        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
