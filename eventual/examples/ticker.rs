//! Example: a reactor fed by a timer, a stream and a future.
//!
//! Run with `RUST_LOG=eventual=debug` to see the runtime's lifecycle
//! logs, and `EVENTUAL_WORKER_THREADS=2` to pin the worker count.

use eventual::time::sleep;
use eventual::{Completer, Reactor, RuntimeBuilder, StreamController};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Event {
    Tick,
    Reading,
    Ready,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .init();
}

async fn run() {
    let reactor = Reactor::<Event, u64>::new();

    reactor.react(Event::Tick, |n| tracing::info!(n, "tick"));
    reactor.react(Event::Reading, |v| tracing::info!(v, "sensor reading"));
    reactor.react(Event::Ready, |v| tracing::info!(v, "warm-up finished"));
    reactor.on_shutdown(|code| tracing::info!(code, "shutting down"));

    reactor.fire_every(Event::Tick, 0, Duration::from_millis(100));

    let sensor = StreamController::new();
    reactor.add_stream(Event::Reading, &sensor.stream().filter(|v| v % 2 == 0));

    let warm_up = Completer::new();
    reactor.add_future(Event::Ready, &warm_up.future());

    for v in 0..10 {
        sensor.add(v);
        sleep(Duration::from_millis(30)).await;
    }
    warm_up.complete(1);

    sleep(Duration::from_millis(200)).await;
    reactor.shutdown(0);

    if let Ok(code) = reactor.shutdown_future().await {
        tracing::info!(code, "reactor stopped");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let runtime = RuntimeBuilder::from_env()?.build();
    runtime.block_on(run());

    Ok(())
}
