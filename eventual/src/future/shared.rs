use crate::error::Error;
use crate::runtime::context::current_injector;
use crate::runtime::task::spawn_on;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::utils::Slab;

use parking_lot::Mutex;

use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::task::{Poll, Waker};

/// Success continuation, run once with the value.
pub(crate) type OnValue<T> = Box<dyn FnOnce(T) + Send>;

/// Error continuation, run once with the error.
pub(crate) type OnError = Box<dyn FnOnce(Error) + Send>;

/// A continuation and the runtime that was current when it was
/// registered.
///
/// The continuation runs on that runtime, whichever thread settles the
/// cell.
pub(crate) struct Registered<H> {
    handler: H,
    home: Option<InjectorHandle>,
}

impl<H> Registered<H> {
    fn new(handler: H) -> Self {
        Self {
            handler,
            home: current_injector(),
        }
    }
}

/// Lifecycle of a single-assignment cell.
///
/// Transitions only ever leave `Pending`.
pub(crate) enum State<T> {
    Pending(Pending<T>),
    Completed(T),
    Failed(Error),
}

/// Everything registered while the cell is still pending.
pub(crate) struct Pending<T> {
    on_value: Vec<Registered<OnValue<T>>>,
    on_error: Vec<Registered<OnError>>,
    waiters: Slab<Waker>,
}

impl<T> Default for Pending<T> {
    fn default() -> Self {
        Self {
            on_value: Vec::new(),
            on_error: Vec::new(),
            waiters: Slab::new(0),
        }
    }
}

/// State shared between a [`Completer`](crate::Completer) and all clones
/// of its [`Future`](crate::Future).
///
/// The mutex only guards the decision of the terminal outcome and the
/// bookkeeping of pending continuations. Continuations and wakers are
/// always dispatched after the lock has been released, so a continuation
/// may call back into the same cell without deadlocking.
pub(crate) struct Shared<T> {
    state: Mutex<State<T>>,
}

impl<T> Shared<T> {
    /// Unregisters a waiter that stopped waiting before completion.
    pub(crate) fn remove_waiter(&self, key: usize) {
        if let State::Pending(pending) = &mut *self.state.lock() {
            pending.waiters.remove(key);
        }
    }
}

impl<T> Shared<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn pending() -> Self {
        Self {
            state: Mutex::new(State::Pending(Pending::default())),
        }
    }

    pub(crate) fn settled(outcome: Result<T, Error>) -> Self {
        let state = match outcome {
            Ok(value) => State::Completed(value),
            Err(err) => State::Failed(err),
        };

        Self {
            state: Mutex::new(state),
        }
    }

    /// Moves the cell to its terminal state.
    ///
    /// Hands `outcome` back if the cell was already terminal; the caller
    /// decides whether that is misuse.
    pub(crate) fn settle(&self, outcome: Result<T, Error>) -> Result<(), Result<T, Error>> {
        let pending = {
            let mut state = self.state.lock();

            if !matches!(*state, State::Pending(_)) {
                return Err(outcome);
            }

            let terminal = match &outcome {
                Ok(value) => State::Completed(value.clone()),
                Err(err) => State::Failed(err.clone()),
            };

            match mem::replace(&mut *state, terminal) {
                State::Pending(pending) => pending,
                _ => unreachable!("state checked to be pending under the lock"),
            }
        };

        let Pending {
            on_value,
            on_error,
            mut waiters,
        } = pending;

        match outcome {
            Ok(value) => {
                drop(on_error);
                for Registered { handler, home } in on_value {
                    let value = value.clone();
                    dispatch(home, move || handler(value));
                }
            }
            Err(err) => {
                drop(on_value);
                for Registered { handler, home } in on_error {
                    let err = err.clone();
                    dispatch(home, move || handler(err));
                }
            }
        }

        tracing::trace!(waiters = waiters.len(), "future settled");
        for waker in waiters.drain() {
            waker.wake();
        }

        Ok(())
    }

    /// Registers a success continuation.
    ///
    /// Runs it as a separate task right away if the cell already holds a
    /// value; drops it if the cell failed.
    pub(crate) fn on_value(&self, handler: OnValue<T>) {
        let value = {
            let mut state = self.state.lock();

            match &mut *state {
                State::Pending(pending) => {
                    pending.on_value.push(Registered::new(handler));
                    return;
                }
                State::Completed(value) => value.clone(),
                State::Failed(_) => return,
            }
        };

        dispatch(current_injector(), move || handler(value));
    }

    /// Registers an error continuation. Mirror image of [`on_value`].
    ///
    /// [`on_value`]: Self::on_value
    pub(crate) fn on_error(&self, handler: OnError) {
        let err = {
            let mut state = self.state.lock();

            match &mut *state {
                State::Pending(pending) => {
                    pending.on_error.push(Registered::new(handler));
                    return;
                }
                State::Failed(err) => err.clone(),
                State::Completed(_) => return,
            }
        };

        dispatch(current_injector(), move || handler(err));
    }

    /// Returns the terminal outcome, if any.
    pub(crate) fn outcome(&self) -> Option<Result<T, Error>> {
        match &*self.state.lock() {
            State::Pending(_) => None,
            State::Completed(value) => Some(Ok(value.clone())),
            State::Failed(err) => Some(Err(err.clone())),
        }
    }

    pub(crate) fn is_terminal(&self) -> bool {
        !matches!(*self.state.lock(), State::Pending(_))
    }

    /// Returns `true` if the cell failed with a timeout error.
    pub(crate) fn timed_out(&self) -> bool {
        matches!(&*self.state.lock(), State::Failed(err) if err.is_timeout())
    }

    /// Polls the cell on behalf of a waiter.
    ///
    /// `key` remembers the waiter's slot so repeated polls replace the
    /// stored waker instead of piling up new ones.
    pub(crate) fn poll_outcome(&self, key: &mut Option<usize>, waker: &Waker) -> Poll<Result<T, Error>> {
        let mut state = self.state.lock();

        match &mut *state {
            State::Completed(value) => Poll::Ready(Ok(value.clone())),
            State::Failed(err) => Poll::Ready(Err(err.clone())),
            State::Pending(pending) => {
                match key.and_then(|k| pending.waiters.get_mut(k)) {
                    Some(stored) => stored.clone_from(waker),
                    None => *key = Some(pending.waiters.insert(waker.clone())),
                }

                Poll::Pending
            }
        }
    }

    /// Returns the number of continuations and waiters still pending.
    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        match &*self.state.lock() {
            State::Pending(p) => p.on_value.len() + p.on_error.len() + p.waiters.len(),
            _ => 0,
        }
    }
}

/// Runs a continuation as its own task.
///
/// The task goes to `home` if that runtime is still running, else to the
/// runtime of the calling thread. With neither, the continuation runs
/// inline on the calling thread.
fn dispatch(home: Option<InjectorHandle>, f: impl FnOnce() + Send + 'static) {
    let running = |injector: &InjectorHandle| !injector.is_shutdown();

    let target = home
        .filter(running)
        .or_else(|| current_injector().filter(running));

    match target {
        Some(injector) => spawn_on(&injector, async move { f() }),
        None => {
            tracing::debug!("no running runtime for continuation, running inline");
            if panic::catch_unwind(AssertUnwindSafe(f)).is_err() {
                tracing::warn!("continuation panicked");
            }
        }
    }
}
