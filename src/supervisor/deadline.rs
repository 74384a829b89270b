// src/supervisor/deadline.rs

//! The per-invocation deadline value.

use std::time::Duration;

use super::presets::{DEFAULT_MESSAGE, DEFAULT_TIMEOUT_MS};

/// Maximum time a caller waits for one operation, plus the message carried
/// by the timeout failure.
///
/// `grace` only matters for cancellable operations: after the deadline
/// fires and the operation's token is cancelled, the operation may keep
/// running for up to `grace` to clean up. Its outcome is discarded either
/// way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadline {
    timeout: Duration,
    message: String,
    grace: Duration,
}

impl Deadline {
    pub fn new(timeout_ms: u64, message: impl Into<String>) -> Self {
        Self::from_duration(Duration::from_millis(timeout_ms), message)
    }

    pub fn from_duration(timeout: Duration, message: impl Into<String>) -> Self {
        Self {
            timeout,
            message: message.into(),
            grace: Duration::ZERO,
        }
    }

    /// Same deadline with the default message.
    pub fn millis(timeout_ms: u64) -> Self {
        Self::new(timeout_ms, DEFAULT_MESSAGE)
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS, DEFAULT_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ten_seconds() {
        let d = Deadline::default();
        assert_eq!(d.timeout(), Duration::from_secs(10));
        assert_eq!(d.message(), "Operation timed out");
        assert_eq!(d.grace(), Duration::ZERO);
    }

    #[test]
    fn builders_replace_single_fields() {
        let d = Deadline::millis(250)
            .with_message("slow")
            .with_grace(Duration::from_millis(20));
        assert_eq!(d.timeout_ms(), 250);
        assert_eq!(d.message(), "slow");
        assert_eq!(d.grace(), Duration::from_millis(20));
    }
}
