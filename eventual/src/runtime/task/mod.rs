//! Asynchronous task primitives.
//!
//! This module defines how the runtime represents, schedules and
//! executes asynchronous tasks:
//! - task state management,
//! - custom waker integration,
//! - join handles for awaiting task completion.
//!
//! Most users will interact with this module through [`spawn`] and
//! [`JoinHandle`]; the lower-level components are used internally by
//! the executor.

pub(crate) mod handle;
pub(crate) mod state;
pub(crate) mod waker;

pub(crate) use self::core::{Runnable, Task, spawn_on};

mod core;

pub use self::core::spawn;
pub use handle::JoinHandle;
