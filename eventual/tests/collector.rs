use eventual::time::sleep;
use eventual::{Collector, Completer, Error, Observable, Reactor, StreamController};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
struct Failure(String);

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure(err.to_string())
    }
}

async fn eventually(condition: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(Instant::now() < deadline, "condition not reached in time");
        sleep(Duration::from_millis(5)).await;
    }
}

#[eventual::test]
async fn test_collector_get_and_preview() {
    let collector = Collector::new();
    assert!(collector.is_empty());

    collector.add("bla");
    eventually(|| !collector.is_empty()).await;

    assert_eq!(collector.preview(), Some("bla"));
    assert!(!collector.is_empty());

    assert_eq!(collector.get(), Some("bla"));
    assert!(collector.is_empty());
    assert_eq!(collector.get(), None);
    assert_eq!(collector.preview(), None);
}

#[eventual::test]
async fn test_collector_keeps_add_order() {
    let collector = Collector::new();
    for v in 0..50u32 {
        collector.add(v);
    }

    collector.stop();
    collector.stopped().await.unwrap();

    assert_eq!(collector.len(), 50);
    let drained: Vec<_> = std::iter::from_fn(|| collector.get()).collect();
    assert_eq!(drained, (0..50).collect::<Vec<_>>());
}

#[eventual::test]
async fn test_collector_ignores_data_after_stop() {
    let collector = Collector::new();
    collector.add(1u8);
    collector.stop();
    collector.stopped().await.unwrap();

    collector.add(2);
    sleep(Duration::from_millis(20)).await;

    assert_eq!(collector.len(), 1);
}

#[eventual::test]
async fn test_collector_add_future() {
    let collector = Collector::new();
    let completer = Completer::new();

    collector.add_future(&completer.future());
    completer.complete("bla");

    eventually(|| !collector.is_empty()).await;
    assert_eq!(collector.get(), Some("bla"));
}

#[eventual::test]
async fn test_collector_add_future_error() {
    let collector = Collector::<Failure>::new();
    let completer = Completer::<u32>::new();

    collector.add_future_error(&completer.future());
    completer.complete_error(Error::msg("lost"));

    eventually(|| !collector.is_empty()).await;
    assert_eq!(collector.get(), Some(Failure("lost".into())));
}

#[eventual::test]
async fn test_collector_add_stream_until_stop() {
    let collector = Collector::new();
    let controller = StreamController::new();
    let subscription = collector.add_stream(&controller.stream());

    controller.add(1u32);
    controller.add(2);
    eventually(|| collector.len() == 2).await;

    collector.stop();
    subscription.closed().await.unwrap();

    controller.add(3);
    sleep(Duration::from_millis(20)).await;
    assert_eq!(collector.len(), 2);
}

#[eventual::test]
async fn test_collector_add_observable() {
    let collector = Collector::new();
    let observable = Observable::new(0u32);
    collector.add_observable(&observable);

    observable.change(4);
    observable.change(5);

    eventually(|| collector.len() == 2).await;
    assert_eq!(collector.get(), Some(4));
    assert_eq!(collector.get(), Some(5));
}

#[eventual::test]
async fn test_reactor_collect_event() {
    let reactor = Reactor::new();
    let collector = Collector::new();

    assert!(!reactor.collect_event("tick", &collector));
    reactor.fire("tick", 7u32);
    reactor.fire("other", 8);

    eventually(|| !collector.is_empty()).await;
    sleep(Duration::from_millis(20)).await;
    assert_eq!(collector.len(), 1);
    assert_eq!(collector.get(), Some(7));
}
