//! Waiting on a dynamic set of futures.

use crate::future::{Completer, Future};

use parking_lot::Mutex;

use std::fmt;
use std::sync::Arc;

/// Waits until every added future is terminal.
///
/// Futures may be added while others are still pending; a waiter is
/// released as soon as the count of pending futures drops to zero.
#[derive(Clone)]
pub struct FutureWaitGroup {
    inner: Arc<Mutex<Group>>,
}

struct Group {
    pending: usize,
    /// Completed whenever `pending` reaches zero; replaced when it leaves
    /// zero again.
    idle: Completer<()>,
}

impl FutureWaitGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        let idle = Completer::new();
        idle.complete(());

        Self {
            inner: Arc::new(Mutex::new(Group { pending: 0, idle })),
        }
    }

    /// Adds `future` to the group.
    ///
    /// The group counts it as pending until it completes or fails.
    pub fn add<T>(&self, future: &Future<T>)
    where
        T: Clone + Send + Sync + 'static,
    {
        {
            let mut group = self.inner.lock();
            if group.pending == 0 {
                group.idle = Completer::new();
            }
            group.pending += 1;
        }

        let group = self.inner.clone();
        future.on_complete(move || {
            let idle = {
                let mut group = group.lock();
                group.pending -= 1;
                (group.pending == 0).then(|| group.idle.clone())
            };

            if let Some(idle) = idle {
                idle.complete(());
            }
        });
    }

    /// Returns the number of futures still pending.
    pub fn len(&self) -> usize {
        self.inner.lock().pending
    }

    /// Returns `true` if no future is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits until no future is pending.
    pub async fn wait(&self) {
        let idle = self.idle();
        let _ = idle.await;
    }

    /// Blocks the current thread until no future is pending.
    ///
    /// Meant for threads outside the runtime.
    pub fn wait_blocking(&self) {
        let _ = self.idle().wait_blocking();
    }

    fn idle(&self) -> Future<()> {
        self.inner.lock().idle.future()
    }
}

impl Default for FutureWaitGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FutureWaitGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FutureWaitGroup")
            .field("pending", &self.len())
            .finish()
    }
}
