use super::command::Command;
use super::timer::TimerEntry;

use std::collections::BinaryHeap;
use std::sync::mpsc::{Receiver, RecvTimeoutError, SendError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Clonable handle used to send commands to the driver thread.
#[derive(Clone)]
pub(crate) struct DriverHandle {
    sender: Sender<Command>,
}

impl DriverHandle {
    /// Sends a command to the driver.
    ///
    /// Fails only if the driver thread has already exited.
    pub(crate) fn send(&self, command: Command) -> Result<(), SendError<Command>> {
        self.sender.send(command)
    }
}

/// The timer driver.
///
/// Owns the timer heap and the receiving side of the command channel.
/// The driver sleeps until either a command arrives or the earliest
/// deadline passes, then wakes every expired timer.
pub(crate) struct Driver {
    receiver: Receiver<Command>,
    timers: BinaryHeap<TimerEntry>,
}

impl Driver {
    /// Starts the driver on its own thread.
    ///
    /// Returns the command handle together with the thread's join handle.
    pub(crate) fn start() -> (DriverHandle, JoinHandle<()>) {
        let (sender, receiver) = channel();

        let mut driver = Self {
            receiver,
            timers: BinaryHeap::new(),
        };

        let thread = thread::Builder::new()
            .name("eventual-driver".into())
            .spawn(move || driver.run())
            .expect("failed to spawn the timer driver thread");

        (DriverHandle { sender }, thread)
    }

    /// Runs the driver loop until a [`Command::Shutdown`] arrives or every
    /// handle has been dropped.
    fn run(&mut self) {
        tracing::trace!("timer driver started");

        loop {
            let command = match self.timers.peek() {
                Some(timer) => {
                    let timeout = timer.deadline.saturating_duration_since(Instant::now());

                    match self.receiver.recv_timeout(timeout) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match self.receiver.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                },
            };

            match command {
                Some(Command::SetTimer {
                    deadline,
                    waker,
                    cancelled,
                }) => {
                    self.schedule(TimerEntry {
                        deadline,
                        waker,
                        cancelled,
                    });
                }
                Some(Command::Shutdown) => break,
                None => {}
            }

            self.fire_expired();
        }

        tracing::trace!(pending = self.timers.len(), "timer driver stopped");
    }

    /// Adds a timer, dropping the ones whose sleep was abandoned.
    fn schedule(&mut self, timer: TimerEntry) {
        self.timers.retain(|t| !t.is_cancelled());
        self.timers.push(timer);
    }

    /// Pops and fires every timer whose deadline has passed.
    fn fire_expired(&mut self) {
        let now = Instant::now();

        while self.timers.peek().is_some_and(|t| t.deadline <= now) {
            if let Some(timer) = self.timers.pop() {
                timer.fire();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::task::Waker;
    use std::time::Duration;

    fn driver() -> Driver {
        let (_, receiver) = channel();

        Driver {
            receiver,
            timers: BinaryHeap::new(),
        }
    }

    fn entry(after: Duration) -> (TimerEntry, Arc<AtomicBool>) {
        let cancelled = Arc::new(AtomicBool::new(false));
        let entry = TimerEntry {
            deadline: Instant::now() + after,
            waker: Waker::noop().clone(),
            cancelled: cancelled.clone(),
        };

        (entry, cancelled)
    }

    #[test]
    fn scheduling_prunes_abandoned_timers() {
        let mut driver = driver();

        let (first, first_cancelled) = entry(Duration::from_secs(3600));
        let (second, _) = entry(Duration::from_secs(3600));
        driver.schedule(first);
        driver.schedule(second);
        assert_eq!(driver.timers.len(), 2);

        first_cancelled.store(true, Ordering::Release);

        let (third, _) = entry(Duration::from_secs(60));
        driver.schedule(third);
        assert_eq!(driver.timers.len(), 2);
    }

    #[test]
    fn expired_timers_are_popped() {
        let mut driver = driver();

        let (due, _) = entry(Duration::ZERO);
        let (later, _) = entry(Duration::from_secs(3600));
        driver.schedule(due);
        driver.schedule(later);

        driver.fire_expired();
        assert_eq!(driver.timers.len(), 1);
    }
}
