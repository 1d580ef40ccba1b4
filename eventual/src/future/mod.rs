//! Single-assignment futures.
//!
//! A [`Completer`] is the write side of a one-shot cell; its [`Future`] is
//! the read side, which any number of consumers may clone and observe.
//!
//! ```text
//!   Completer ──complete(v)──► Pending ──► Completed(v)
//!             ──complete_error(e)──────► Failed(e)
//! ```
//!
//! Continuations registered with [`Future::then`] and [`Future::err`]
//! never run inline: each one is spawned as its own task on the current
//! runtime once the cell becomes terminal. Sibling continuations therefore
//! run concurrently, while a chain of `then` calls runs in order.
//!
//! Completing a cell twice is a bug in the caller and panics.

mod completer;
mod handle;
mod shared;
mod wait;

pub use completer::Completer;
pub use handle::Future;
pub use wait::Wait;
