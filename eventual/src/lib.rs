//! # Eventual
//!
//! **Eventual** provides concurrency primitives for exchanging one-shot
//! results and ongoing event sequences between independently scheduled
//! producers and consumers, without consumers managing locks themselves.
//!
//! It is organised in three layers, each built on the previous one:
//!
//! - [`Future`] / [`Completer`]: a single-assignment cell holding a value
//!   or an [`Error`], with continuations run as independent tasks,
//! - [`Stream`] / [`StreamController`]: an append-only chain of elements
//!   that any number of subscribers walk at their own pace, plus derived
//!   streams (filter, transform, first),
//! - [`Reactor`]: a classifier-keyed dispatcher that serializes events from
//!   many sources into one strictly ordered sequence of handler calls.
//!
//! Everything runs on the crate's own work-stealing runtime, which also
//! provides a timer driver for [`time::sleep`] and [`time::timeout`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use eventual::{Completer, StreamController};
//!
//! #[eventual::main]
//! async fn main() {
//!     let completer = Completer::new();
//!     let doubled = completer.future().then(|v: u32| v * 2);
//!     completer.complete(21);
//!     assert_eq!(doubled.await.unwrap(), 42);
//!
//!     let controller = StreamController::new();
//!     let first = controller.stream().first_where(|v: &u32| v % 2 == 1);
//!     for v in [2, 4, 5, 6] {
//!         controller.add(v);
//!     }
//!     assert_eq!(first.await.unwrap(), 5);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`future`]: single-assignment futures and completers
//! - [`stream`]: streams, controllers and subscriptions
//! - [`reactor`]: serialized event dispatch
//! - [`collector`]: a reactor-backed sink for later retrieval
//! - [`cache`]: a fixed-size cache of futures
//! - [`time`]: sleep and timeout on the runtime's timer driver
//! - [`task`]: spawning tasks onto the runtime
//!
//! ## Logging
//!
//! The crate reports lifecycle events through [`tracing`]. It never
//! installs a subscriber.

mod driver;
mod runtime;
mod utils;

pub mod cache;
pub mod collector;
pub mod error;
pub mod future;
pub mod observable;
pub mod reactor;
pub mod shutdown;
pub mod stream;
pub mod time;
pub mod wait_group;

pub use cache::FutureCache;
pub use collector::Collector;
pub use error::{ConfigError, Error, Result};
pub use future::{Completer, Future};
pub use observable::Observable;
pub use reactor::Reactor;
pub use runtime::Runtime;
pub use runtime::builder::{RuntimeBuilder, WORKER_THREADS_ENV};
pub use runtime::task;
pub use runtime::yield_now::yield_now;
pub use shutdown::{ShutdownRegistry, Shutdowner};
pub use stream::{Delivery, Stream, StreamController, Subscription};
pub use wait_group::FutureWaitGroup;

pub use eventual_macros::{main, test};
