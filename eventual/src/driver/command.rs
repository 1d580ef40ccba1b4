use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::task::Waker;
use std::time::Instant;

/// Requests accepted by the timer driver thread.
pub(crate) enum Command {
    /// Wake `waker` once `deadline` has passed, unless `cancelled` is set
    /// by then.
    SetTimer {
        deadline: Instant,
        waker: Waker,
        cancelled: Arc<AtomicBool>,
    },
    /// Stop the driver thread. Pending timers are dropped without firing.
    Shutdown,
}
