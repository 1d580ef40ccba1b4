//! Timer utilities.
//!
//! - [`sleep`] waits for a duration using the runtime's timer driver,
//! - [`timeout`] bounds the execution time of a future.
//!
//! Both must be polled inside a runtime.

mod sleep;
mod timeout;

#[doc(inline)]
pub use sleep::{Sleep, sleep};

#[doc(inline)]
pub use timeout::{Elapsed, Timeout, timeout};
