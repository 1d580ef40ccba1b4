//! Task executor implementation.
//!
//! - [`core`]: executor construction and lifecycle management,
//! - [`worker`]: worker threads that run tasks using work-stealing.

pub(crate) mod core;
pub(crate) mod worker;
