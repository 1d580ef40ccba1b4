//! Internal data structures.
//!
//! [`Slab`] provides indexed storage with slot reuse; futures use it to
//! keep the wakers of pending waiters addressable so a dropped waiter can
//! unregister itself.

mod slab;

pub(crate) use slab::Slab;
