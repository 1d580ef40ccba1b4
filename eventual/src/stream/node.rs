use crate::future::Future;

use std::sync::Arc;

/// One published element and the link to its successor.
///
/// `next` is completed exactly once, when the following element is added.
pub(crate) struct Node<T> {
    pub(crate) data: T,
    pub(crate) next: Link<T>,
}

/// Pending reference to the next node in a chain.
pub(crate) type Link<T> = Future<Arc<Node<T>>>;
