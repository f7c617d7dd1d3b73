//! Configuration for the blocking cache decorator.

use std::time::Duration;

/// Configuration for [`crate::BlockingCache`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockingCacheConfig {
    /// Maximum time to wait for a key lock in milliseconds, `0` waits indefinitely (default: 0).
    pub timeout_ms: u64,

    /// Release the caller's hold on a key when it removes that key (default: false).
    ///
    /// By default `remove` only touches the store, so a thread that missed on a key and then
    /// removed it still holds the key lock until it calls `put` or `release`.
    pub release_on_remove: bool,
}

impl BlockingCacheConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lock timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Maximum wait, anything below one millisecond means no timeout.
    ///
    /// # Returns
    ///
    /// The modified configuration (builder pattern).
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Makes `remove` release the caller's hold on the removed key.
    ///
    /// # Returns
    ///
    /// The modified configuration (builder pattern).
    #[must_use]
    pub fn with_release_on_remove(mut self, release: bool) -> Self {
        self.release_on_remove = release;
        self
    }
}
