//! Timer driver.
//!
//! The driver runs on a dedicated thread next to the executor. It owns a
//! deadline-ordered queue of timers and wakes the tasks waiting on them
//! once their deadlines pass.
//!
//! Tasks talk to the driver through [`Command`]s sent over a
//! [`DriverHandle`]; the handle is installed in every worker's runtime
//! context so [`sleep`](crate::time::sleep) can reach it without explicit
//! plumbing.

mod core;
mod timer;

pub(crate) mod command;

pub(crate) use self::core::{Driver, DriverHandle};
