//! Ordered multicast streams.
//!
//! A stream is an append-only chain of nodes. Each node carries one
//! element and a [`Future`](crate::Future) for the node that follows it:
//!
//! ```text
//!   head ─► [ 1 | next ] ─► [ 2 | next ] ─► [ 3 | next ] ─► (pending)
//!                                                              ▲
//!                                        StreamController::add ┘
//! ```
//!
//! A [`StreamController`] owns the pending tail. Every `add` completes it
//! with a new node and rotates to a fresh tail. A subscriber starts from
//! the tail current at the time it calls [`Stream::listen`] and walks the
//! chain at its own pace, so a slow subscriber never holds back the
//! producer or other subscribers. Nodes are freed once no subscriber is
//! behind them.

mod controller;
mod derived;
mod listen;
mod node;
mod handle;
mod subscription;

pub use controller::StreamController;
pub use listen::Delivery;
pub use handle::Stream;
pub use subscription::Subscription;
