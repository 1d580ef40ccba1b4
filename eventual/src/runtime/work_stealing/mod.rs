//! Work-stealing scheduler components.
//!
//! - [`injector`]: a global queue for tasks scheduled from outside a
//!   worker and for rescheduled tasks,
//! - [`queue`]: per-worker local queues used for fast local execution
//!   and task stealing.

pub(crate) mod injector;
pub(crate) mod queue;
