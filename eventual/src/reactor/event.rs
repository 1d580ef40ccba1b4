/// Routing key of an event inside a reactor.
///
/// Shutdown has its own variant so no user classifier can collide with
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) enum Classifier<C> {
    User(C),
    Shutdown,
}

/// An event travelling through a reactor's inbound stream.
#[derive(Clone)]
pub(super) struct Event<C, T> {
    pub(super) classifier: Classifier<C>,
    pub(super) data: T,
}
