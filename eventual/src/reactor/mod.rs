//! Serialized event dispatch.
//!
//! A [`Reactor`] funnels events from any number of producers (direct
//! [`fire`](Reactor::fire) calls, timers, streams, futures, observables)
//! into one internal stream with a single blocking listener. That
//! listener looks up the handler registered for each event's classifier
//! and runs it to completion before taking the next event, so handlers
//! of one reactor never run concurrently and always run in the order
//! their events were enqueued.
//!
//! Shutdown is an event like any other: it is handled after everything
//! fired before it, then the reactor stops accepting events.

mod core;
mod event;
mod sources;

pub use self::core::Reactor;
