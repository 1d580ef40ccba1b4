use eventual::time::sleep;
use eventual::{Completer, Error, Observable, Reactor, StreamController, task};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Kind {
    Value,
    Tick,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
enum Msg {
    Value(u32),
    Failed(String),
}

impl From<Error> for Msg {
    fn from(err: Error) -> Self {
        Msg::Failed(err.to_string())
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
async fn test_handlers_run_in_fire_order() {
    let reactor = Reactor::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    reactor.react(Kind::Value, move |v: u32| sink.lock().unwrap().push(v));

    for v in 0..200 {
        reactor.fire(Kind::Value, v);
    }
    reactor.shutdown(0);
    reactor.shutdown_future().await.unwrap();

    assert_eq!(*seen.lock().unwrap(), (0..200).collect::<Vec<_>>());
}

#[eventual::test(worker_threads = 4)]
async fn test_handlers_never_overlap() {
    let reactor = Reactor::new();
    let running = Arc::new(AtomicUsize::new(0));
    let overlaps = Arc::new(AtomicUsize::new(0));
    let handled = Arc::new(AtomicUsize::new(0));

    let (r, o, h) = (running.clone(), overlaps.clone(), handled.clone());
    reactor.react(Kind::Value, move |_: u32| {
        if r.fetch_add(1, Ordering::SeqCst) != 0 {
            o.fetch_add(1, Ordering::SeqCst);
        }
        std::thread::sleep(Duration::from_micros(200));
        r.fetch_sub(1, Ordering::SeqCst);
        h.fetch_add(1, Ordering::SeqCst);
    });

    let producers: Vec<_> = (0..4)
        .map(|p| {
            let reactor = reactor.clone();
            task::spawn(async move {
                for v in 0..25 {
                    reactor.fire(Kind::Value, p * 100 + v);
                }
            })
        })
        .collect();
    for producer in producers {
        producer.await;
    }

    eventually(|| handled.load(Ordering::SeqCst) == 100).await;
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
}

#[eventual::test(worker_threads = 4)]
async fn test_sequential_producers_keep_fire_order() {
    let reactor = Reactor::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    reactor.react(Kind::Value, move |v: u32| sink.lock().unwrap().push(v));

    for p in 0..8 {
        let reactor = reactor.clone();
        task::spawn(async move {
            for v in 0..10 {
                reactor.fire(Kind::Value, p * 10 + v);
            }
        })
        .await;
    }
    reactor.shutdown(0);
    reactor.shutdown_future().await.unwrap();

    assert_eq!(*seen.lock().unwrap(), (0..80).collect::<Vec<_>>());
}

#[eventual::test]
async fn test_add_future_completed_from_plain_thread() {
    let reactor = Reactor::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    reactor.react(Kind::Value, move |m: Msg| sink.lock().unwrap().push(m));

    let completer = Completer::new();
    reactor.add_future(Kind::Value, &completer.future());
    std::thread::spawn(move || completer.complete(Msg::Value(6)))
        .join()
        .unwrap();

    eventually(|| !seen.lock().unwrap().is_empty()).await;
    assert_eq!(*seen.lock().unwrap(), vec![Msg::Value(6)]);
}

#[eventual::test]
async fn test_shutdown_is_final() {
    let reactor = Reactor::new();
    let handled = Arc::new(AtomicUsize::new(0));

    let counter = handled.clone();
    reactor.react(Kind::Value, move |_: u32| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    reactor.fire(Kind::Value, 1);
    reactor.shutdown(42);

    assert_eq!(reactor.shutdown_future().await.unwrap(), 42);
    assert!(reactor.is_shut_down());

    reactor.fire(Kind::Value, 2);
    reactor.shutdown(43);
    sleep(Duration::from_millis(20)).await;

    assert_eq!(handled.load(Ordering::SeqCst), 1);
    assert_eq!(reactor.shutdown_future().result(), Some(42));
}

#[eventual::test]
async fn test_on_shutdown_runs_before_completion() {
    let reactor = Reactor::<Kind, u32>::new();
    let observed = Arc::new(Mutex::new(None));

    let sink = observed.clone();
    let handle = reactor.clone();
    reactor.on_shutdown(move |v| {
        *sink.lock().unwrap() = Some((v, handle.is_shut_down()));
    });

    reactor.shutdown(7);
    reactor.shutdown_future().await.unwrap();

    assert_eq!(*observed.lock().unwrap(), Some((7, false)));
}

#[eventual::test]
async fn test_react_overwrites_and_try_react_refuses() {
    let reactor = Reactor::<Kind, u32>::new();
    let last = Arc::new(Mutex::new(String::new()));

    let sink = last.clone();
    assert!(!reactor.react(Kind::Value, move |_| *sink.lock().unwrap() = "first".into()));
    let sink = last.clone();
    assert!(reactor.react(Kind::Value, move |_| *sink.lock().unwrap() = "second".into()));

    let refused = reactor.try_react(Kind::Value, |_| {});
    assert!(matches!(refused, Err(Error::HandlerExists)));
    assert!(reactor.try_react(Kind::Tick, |_| {}).is_ok());

    reactor.fire(Kind::Value, 0);
    reactor.shutdown(0);
    reactor.shutdown_future().await.unwrap();

    assert_eq!(*last.lock().unwrap(), "second");
}

#[eventual::test]
async fn test_handler_can_reenter_reactor() {
    let reactor = Reactor::<Kind, u32>::new();
    let ticks = Arc::new(AtomicUsize::new(0));

    let handle = reactor.clone();
    let counter = ticks.clone();
    reactor.react(Kind::Value, move |v| {
        let counter = counter.clone();
        handle.react(Kind::Tick, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        handle.fire(Kind::Tick, v);
    });

    reactor.fire(Kind::Value, 1);
    eventually(|| ticks.load(Ordering::SeqCst) == 1).await;

    reactor.shutdown(0);
    reactor.shutdown_future().await.unwrap();
}

#[eventual::test]
async fn test_unhandled_classifier_is_skipped() {
    let reactor = Reactor::<Kind, u32>::new();

    reactor.fire(Kind::Tick, 1);
    reactor.shutdown(5);

    assert_eq!(reactor.shutdown_future().await.unwrap(), 5);
}

#[eventual::test]
async fn test_fire_in() {
    let reactor = Reactor::<Kind, u32>::new();
    let fired = Completer::new();

    let sink = fired.clone();
    let start = Instant::now();
    reactor.react(Kind::Tick, move |v| sink.complete((v, start.elapsed())));

    reactor.fire_in(Kind::Tick, 3, Duration::from_millis(30));

    let (v, elapsed) = fired.future().await.unwrap();
    assert_eq!(v, 3);
    assert!(elapsed >= Duration::from_millis(30));
}

#[eventual::test]
async fn test_fire_in_is_dropped_after_shutdown() {
    let reactor = Reactor::<Kind, u32>::new();
    let handled = Arc::new(AtomicUsize::new(0));

    let counter = handled.clone();
    reactor.react(Kind::Tick, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    reactor.fire_in(Kind::Tick, 1, Duration::from_millis(20));
    reactor.shutdown(0);
    reactor.shutdown_future().await.unwrap();

    sleep(Duration::from_millis(40)).await;
    assert_eq!(handled.load(Ordering::SeqCst), 0);
}

#[eventual::test]
async fn test_fire_every_stops_at_shutdown() {
    let reactor = Reactor::<Kind, u32>::new();
    let ticks = Arc::new(AtomicUsize::new(0));

    let counter = ticks.clone();
    reactor.react(Kind::Tick, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    reactor.fire_every(Kind::Tick, 0, Duration::from_millis(5));
    eventually(|| ticks.load(Ordering::SeqCst) >= 3).await;

    reactor.shutdown(0);
    reactor.shutdown_future().await.unwrap();

    let after_shutdown = ticks.load(Ordering::SeqCst);
    sleep(Duration::from_millis(30)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), after_shutdown);
}

#[eventual::test]
async fn test_add_stream_future_and_error() {
    let reactor = Reactor::<Kind, Msg>::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    for kind in [Kind::Value, Kind::Failure] {
        let sink = seen.clone();
        reactor.react(kind, move |msg| sink.lock().unwrap().push(msg));
    }

    let controller = StreamController::new();
    reactor.add_stream(Kind::Value, &controller.stream());

    let value = Completer::new();
    reactor.add_future(Kind::Value, &value.future());

    let failure = Completer::<()>::new();
    reactor.add_future_error(Kind::Failure, &failure.future());

    controller.add(Msg::Value(1));
    eventually(|| seen.lock().unwrap().len() == 1).await;

    value.complete(Msg::Value(2));
    eventually(|| seen.lock().unwrap().len() == 2).await;

    failure.complete_error(Error::msg("broken"));
    eventually(|| seen.lock().unwrap().len() == 3).await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Msg::Value(1), Msg::Value(2), Msg::Failed("broken".into())]
    );
}

#[eventual::test]
async fn test_add_stream_stops_at_shutdown() {
    let reactor = Reactor::<Kind, u32>::new();
    let controller = StreamController::new();

    let subscription = reactor.add_stream(Kind::Value, &controller.stream());

    reactor.shutdown(0);
    reactor.shutdown_future().await.unwrap();

    subscription.closed().await.unwrap();
    assert!(subscription.is_cancelled());
    controller.add(1);
}

#[eventual::test]
async fn test_add_observable() {
    let reactor = Reactor::<Kind, u32>::new();
    let observable = Observable::new(0);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = seen.clone();
    reactor.react(Kind::Value, move |v| sink.lock().unwrap().push(v));
    reactor.add_observable(Kind::Value, &observable);

    observable.change(1);
    observable.change(2);

    eventually(|| seen.lock().unwrap().len() == 2).await;
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
}
