//! Key-value stores and the blocking decorator.
//!
//! # Key Components
//!
//! - [`Cache`]: The store capability (`put`, `get`, `remove`, `clear`, `size`, `id`)
//! - [`PerpetualCache`]: Unbounded in-memory store
//! - [`BlockingCache`]: Decorator making concurrent misses on one key wait for the first
//!   caller to fill it
//!
//! # Examples
//!
//! ```rust
//! use propscope::{BlockingCache, Cache, PerpetualCache};
//!
//! let cache = BlockingCache::new(PerpetualCache::<String, u32>::new("users"));
//!
//! // A miss keeps the key locked for this thread until it fills the key
//! assert_eq!(cache.get(&"alice".to_string())?, None);
//! cache.put("alice".to_string(), 42)?;
//! assert_eq!(cache.get(&"alice".to_string())?, Some(42));
//! # Ok::<(), propscope::Error>(())
//! ```

mod blocking;
mod config;
mod perpetual;

pub use blocking::BlockingCache;
pub use config::BlockingCacheConfig;
pub use perpetual::PerpetualCache;

use crate::Result;

/// A key-value store.
///
/// All operations take `&self`; implementations synchronize internally and may be shared
/// between threads.
pub trait Cache<K, V>: Send + Sync {
    /// Identifier of the store, used in error messages
    fn id(&self) -> &str;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    /// Implementation specific.
    fn put(&self, key: K, value: V) -> Result<()>;

    /// Look up `key`
    ///
    /// # Errors
    /// Implementation specific.
    fn get(&self, key: &K) -> Result<Option<V>>;

    /// Remove `key`, returning the previous value
    ///
    /// # Errors
    /// Implementation specific.
    fn remove(&self, key: &K) -> Result<Option<V>>;

    /// Remove every entry
    ///
    /// # Errors
    /// Implementation specific.
    fn clear(&self) -> Result<()>;

    /// Number of stored entries
    fn size(&self) -> usize;
}
