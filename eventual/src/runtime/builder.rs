use super::Runtime;
use crate::error::ConfigError;

use std::env;
use std::thread;

/// Environment variable read by [`RuntimeBuilder::from_env`].
pub const WORKER_THREADS_ENV: &str = "EVENTUAL_WORKER_THREADS";

/// Builder for configuring and creating a runtime.
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .worker_threads(4)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    /// Number of worker threads in the executor.
    worker_threads: usize,
}

impl RuntimeBuilder {
    /// Creates a new `RuntimeBuilder` with default configuration.
    ///
    /// By default, the number of worker threads is set to the number
    /// of available logical CPUs, falling back to `1` if unavailable.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self { worker_threads }
    }

    /// Creates a builder from the process environment.
    ///
    /// `EVENTUAL_WORKER_THREADS` overrides the worker count when set.
    /// Unset falls back to the defaults of [`new`](Self::new).
    pub fn from_env() -> Result<Self, ConfigError> {
        let builder = Self::new();

        match env::var(WORKER_THREADS_ENV) {
            Ok(raw) => builder.worker_threads_from_str(&raw),
            Err(env::VarError::NotPresent) => Ok(builder),
            Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidWorkerThreads {
                value: "<non-unicode>".into(),
            }),
        }
    }

    /// Applies a textual worker count, as found in the environment.
    pub(crate) fn worker_threads_from_str(self, raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(self.worker_threads(n)),
            _ => Err(ConfigError::InvalidWorkerThreads {
                value: raw.to_owned(),
            }),
        }
    }

    /// Sets the number of worker threads used by the runtime.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Builds the runtime with the configured options.
    ///
    /// This starts the timer driver and the executor workers.
    pub fn build(self) -> Runtime {
        Runtime::new(self.worker_threads)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
