use eventual::{RuntimeBuilder, task, yield_now};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

async fn explode() -> u32 {
    panic!("boom")
}

#[test]
fn test_block_on_returns_output() {
    let runtime = RuntimeBuilder::new().worker_threads(1).build();
    assert_eq!(runtime.block_on(async { 6 * 7 }), 42);
}

#[test]
fn test_spawned_tasks_spread_over_workers() {
    let runtime = RuntimeBuilder::new().worker_threads(4).build();
    let workers = Arc::new(Mutex::new(HashSet::new()));

    let seen = workers.clone();
    let total = runtime.block_on(async move {
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let seen = seen.clone();
                task::spawn(async move {
                    let name = thread::current().name().map(str::to_owned);
                    seen.lock().unwrap().insert(name);
                    yield_now().await;
                    i
                })
            })
            .collect();

        let mut total = 0;
        for handle in handles {
            total += handle.await;
        }
        total
    });

    assert_eq!(total, (0..64).sum::<i32>());
    assert!(
        workers
            .lock()
            .unwrap()
            .iter()
            .all(|name| name.as_deref().is_some_and(|n| n.starts_with("eventual-worker-")))
    );
}

#[test]
fn test_nested_spawns_resolve_inside_out() {
    let runtime = RuntimeBuilder::new().worker_threads(2).build();

    let result = runtime.block_on(async {
        task::spawn(async { task::spawn(async { 1 }).await + 2 }).await + 3
    });

    assert_eq!(result, 6);
}

#[test]
fn test_runtime_spawn_detached() {
    let runtime = RuntimeBuilder::new().worker_threads(2).build();
    let (transmitter, receiver) = std::sync::mpsc::channel();

    runtime.spawn(async move {
        let _ = transmitter.send("ran");
    });

    assert_eq!(receiver.recv(), Ok("ran"));
}

#[test]
fn test_enter_allows_spawn_from_foreign_thread() {
    let runtime = RuntimeBuilder::new().worker_threads(1).build();

    let handle = runtime.enter(|| task::spawn(async { "spawned" }));

    assert_eq!(runtime.block_on(handle), "spawned");
}

#[test]
#[should_panic(expected = "spawn must be called within the context of a runtime")]
fn test_spawn_outside_runtime_panics() {
    let _ = task::spawn(async {});
}

#[test]
#[should_panic(expected = "boom")]
fn test_block_on_resumes_panic() {
    let runtime = RuntimeBuilder::new().worker_threads(1).build();
    runtime.block_on(explode());
}

#[test]
fn test_worker_survives_task_panic() {
    let runtime = RuntimeBuilder::new().worker_threads(1).build();

    let survived = runtime.block_on(async {
        let failed = task::spawn(explode());
        while !failed.is_finished() {
            yield_now().await;
        }
        task::spawn(async { true }).await
    });

    assert!(survived);
}

#[test]
#[should_panic(expected = "worker_threads must be > 0")]
fn test_zero_worker_threads_panics() {
    let _ = RuntimeBuilder::new().worker_threads(0);
}
