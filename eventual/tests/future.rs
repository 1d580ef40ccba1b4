use eventual::time::sleep;
use eventual::{Completer, Error, Future, RuntimeBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[eventual::test]
async fn test_then_handlers_see_value_exactly_once() {
    let completer = Completer::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let register = |future: &Future<u32>| {
        let calls = calls.clone();
        future.then(move |v| {
            calls.fetch_add(1, Ordering::SeqCst);
            v + 1
        })
    };

    let mut chained: Vec<_> = (0..3).map(|_| register(&completer.future())).collect();
    completer.complete(7);
    chained.extend((0..3).map(|_| register(&completer.future())));

    for future in chained {
        assert_eq!(future.await.unwrap(), 8);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[eventual::test]
async fn test_then_chain_preserves_order() {
    let completer = Completer::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    let (a, b, c) = (order.clone(), order.clone(), order.clone());
    let last = completer
        .future()
        .then(move |v: u32| {
            a.lock().unwrap().push(1);
            v
        })
        .then(move |v| {
            b.lock().unwrap().push(2);
            v
        })
        .then(move |v| {
            c.lock().unwrap().push(3);
            v
        });

    completer.complete(0);
    last.await.unwrap();

    assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
}

#[eventual::test]
async fn test_error_skips_then_and_runs_err() {
    let completer = Completer::<u32>::new();
    let ran = Arc::new(AtomicUsize::new(0));

    let counter = ran.clone();
    let mapped = completer.future().then(move |v| {
        counter.fetch_add(1, Ordering::SeqCst);
        v
    });
    let recovered = completer.future().err(|err| {
        assert_eq!(err.to_string(), "boom");
        Ok(0)
    });

    completer.complete_error(Error::msg("boom"));

    let err = mapped.await.unwrap_err();
    assert_eq!(err.to_string(), "boom");
    assert_eq!(recovered.await.unwrap(), 0);
    assert_eq!(ran.load(Ordering::SeqCst), 0);
}

#[eventual::test]
async fn test_err_passes_value_through() {
    let completer = Completer::new();
    let passed = completer.future().err(|_| Ok(0));

    completer.complete(3u32);

    assert_eq!(passed.await.unwrap(), 3);
}

#[eventual::test]
async fn test_err_can_fail_again() {
    let failed = Future::<u32>::failed(Error::msg("first"));
    let again = failed.err(|_| Err(Error::msg("second")));

    assert_eq!(again.await.unwrap_err().to_string(), "second");
}

#[eventual::test]
#[should_panic(expected = "future completed twice")]
async fn test_double_completion_aborts() {
    let completer = Completer::new();
    completer.complete_error(Error::msg("once"));
    completer.complete(1u8);
}

#[eventual::test]
async fn test_observation_before_and_after_completion() {
    let completer = Completer::new();
    let future = completer.future();

    assert!(!future.is_completed());
    assert!(future.result().is_none());
    assert!(future.err_result().is_none());

    completer.complete(String::from("done"));

    assert!(completer.is_completed());
    assert_eq!(future.result().as_deref(), Some("done"));
    assert!(future.err_result().is_none());
}

#[eventual::test]
async fn test_ready_and_failed_constructors() {
    assert_eq!(Future::ready(5u8).await.unwrap(), 5);

    let failed = Future::<u8>::failed(Error::StreamClosed);
    assert!(failed.is_completed());
    assert!(matches!(failed.err_result(), Some(Error::StreamClosed)));
}

#[eventual::test]
async fn test_timeout_completer_fails_with_timeout() {
    let completer = Completer::<u32>::with_timeout(Duration::from_millis(20));
    let future = completer.future();

    let err = future.wait().await.unwrap_err();
    assert!(err.is_timeout());

    // Losing the race against the timer is not a double completion.
    completer.complete(1);
    assert!(future.result().is_none());
}

#[eventual::test]
async fn test_timeout_completer_completed_in_time() {
    let completer = Completer::with_timeout(Duration::from_millis(30));
    completer.complete(5u32);

    sleep(Duration::from_millis(60)).await;

    assert_eq!(completer.future().result(), Some(5));
}

#[eventual::test]
async fn test_wait_timeout() {
    let completer = Completer::new();
    let future = completer.future();

    assert!(!future.wait_timeout(Duration::from_millis(20)).await);

    completer.complete(());
    assert!(future.wait_timeout(Duration::from_millis(20)).await);
}

#[eventual::test(worker_threads = 4)]
async fn test_as_receiver_delivers_value_once() {
    let completer = Completer::new();
    let receiver = completer.future().as_receiver();

    completer.complete(11u32);

    assert_eq!(receiver.recv_timeout(Duration::from_secs(1)), Ok(11));
    assert!(receiver.recv_timeout(Duration::from_secs(1)).is_err());
}

#[eventual::test(worker_threads = 4)]
async fn test_as_receiver_disconnects_on_failure() {
    let completer = Completer::<u32>::new();
    let receiver = completer.future().as_receiver();

    completer.complete_error(Error::msg("nope"));

    assert!(receiver.recv_timeout(Duration::from_secs(1)).is_err());
}

#[test]
fn test_wait_blocking_from_plain_thread() {
    let completer = Completer::new();
    let future = completer.future();

    let waiter = thread::spawn(move || future.wait_blocking());

    thread::sleep(Duration::from_millis(20));
    completer.complete(9u32);

    assert_eq!(waiter.join().unwrap().unwrap(), 9);
}

#[test]
fn test_complete_from_foreign_thread_with_enter() {
    let runtime = RuntimeBuilder::new().worker_threads(2).build();

    let completer = Completer::new();
    let doubled = completer.future().then(|v: u32| v * 2);

    runtime.enter(|| completer.complete(4));

    assert_eq!(doubled.wait_blocking().unwrap(), 8);
}

#[eventual::test(worker_threads = 4)]
async fn test_continuations_survive_completion_from_plain_thread() {
    let completer = Completer::new();
    let doubled = completer.future().then(|v: u32| v * 2);
    let passed = completer.future().err(|_| Ok(0));
    let receiver = completer.future().as_receiver();

    thread::spawn(move || completer.complete(21)).join().unwrap();

    assert!(doubled.wait_timeout(Duration::from_secs(1)).await);
    assert_eq!(doubled.result(), Some(42));
    assert_eq!(passed.await.unwrap(), 21);
    assert_eq!(receiver.recv_timeout(Duration::from_secs(1)), Ok(21));
}

#[eventual::test]
async fn test_error_continuations_survive_failure_from_plain_thread() {
    let completer = Completer::<u32>::new();
    let recovered = completer.future().err(|err| {
        assert_eq!(err.to_string(), "remote");
        Ok(1)
    });
    let skipped = completer.future().then(|v| v + 1);

    thread::spawn(move || completer.complete_error(Error::msg("remote")))
        .join()
        .unwrap();

    assert_eq!(recovered.await.unwrap(), 1);
    assert_eq!(skipped.await.unwrap_err().to_string(), "remote");
}

#[test]
fn test_continuation_runs_inline_without_runtime() {
    let completer = Completer::new();
    let next = completer.future().then(|v: u32| v + 1);

    completer.complete(1);

    assert_eq!(next.result(), Some(2));
}

#[eventual::test]
async fn test_unbounded_timeouts() {
    let completer = Completer::with_timeout(Duration::MAX);
    let future = completer.future();

    assert!(!future.wait_timeout(Duration::from_millis(10)).await);

    completer.complete(3u32);
    assert!(future.wait_timeout(Duration::MAX).await);
    assert_eq!(future.result(), Some(3));
}
