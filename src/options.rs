use std::time::Duration;

/// Configures per-attempt timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SendOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Total number of attempts, including the first. `0` is treated as `1`.
    pub max_attempts: u32,
    /// Base retry backoff in milliseconds (doubles on each further retry).
    pub retry_backoff_ms: u64,
}

impl SendOptions {
    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub(crate) fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub(crate) fn attempt_cap(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_attempts: 3,
            retry_backoff_ms: 1_000,
        }
    }
}
