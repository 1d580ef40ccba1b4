//! Core runtime components.
//!
//! This module contains the execution substrate every primitive of the
//! crate is scheduled on: a work-stealing multi-threaded executor, the
//! task abstraction, and the thread-local runtime context.
//!
//! Continuations registered on a [`Future`](crate::Future), non-blocking
//! stream deliveries and reactor timers all run as tasks spawned here.

mod core;
mod executor;
pub(crate) mod work_stealing;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod yield_now;

pub mod task;

pub use self::core::Runtime;
