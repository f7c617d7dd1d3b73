//! Blocking decorator over a [`Cache`].
//!
//! A `get` that misses keeps the key locked for the calling thread. Other threads asking for
//! the same key block until the first thread fills it with `put`, so an expensive value is
//! computed once instead of once per concurrent caller.
//!
//! # Lock Lifecycle
//!
//! - A lock is created the first time a key is seen and kept for the lifetime of the cache
//! - `get` acquires the key lock; a hit releases it before returning, a miss retains it
//! - `put` writes through and then releases one hold of the calling thread
//! - `remove` and `clear` only touch the store, unless
//!   [`BlockingCacheConfig::release_on_remove`] is set
//!
//! Locks are reentrant: a thread missing twice on one key holds it twice and needs two `put`s.

use std::{
    fmt::Debug,
    hash::Hash,
    marker::PhantomData,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use dashmap::DashMap;
use tracing::{trace, warn};

use crate::{
    cache::{BlockingCacheConfig, Cache},
    utils::synchronization::{ReentrantKeyLock, WaitOutcome},
    Error, Result,
};

/// Per-key locking decorator
///
/// # Examples
///
/// ```rust
/// use std::{sync::Arc, thread};
/// use propscope::{BlockingCache, BlockingCacheConfig, Cache, PerpetualCache};
///
/// let cache = Arc::new(BlockingCache::with_config(
///     PerpetualCache::<u32, String>::new("reports"),
///     &BlockingCacheConfig::new().with_timeout(std::time::Duration::from_secs(5)),
/// ));
///
/// let workers: Vec<_> = (0..4)
///     .map(|_| {
///         let cache = cache.clone();
///         thread::spawn(move || -> propscope::Result<String> {
///             if let Some(report) = cache.get(&7)? {
///                 return Ok(report);
///             }
///             let report = "expensive".to_string();
///             cache.put(7, report.clone())?;
///             Ok(report)
///         })
///     })
///     .collect();
///
/// for worker in workers {
///     assert_eq!(worker.join().unwrap()?, "expensive");
/// }
/// # Ok::<(), propscope::Error>(())
/// ```
pub struct BlockingCache<K, V, C> {
    delegate: C,
    locks: DashMap<K, Arc<ReentrantKeyLock>>,
    timeout_ms: AtomicU64,
    release_on_remove: bool,
    _value: PhantomData<fn() -> V>,
}

impl<K, V, C> BlockingCache<K, V, C>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    C: Cache<K, V>,
{
    /// Wrap `delegate`, waiting indefinitely for key locks
    pub fn new(delegate: C) -> Self {
        Self::with_config(delegate, &BlockingCacheConfig::default())
    }

    /// Wrap `delegate` with an explicit configuration
    pub fn with_config(delegate: C, config: &BlockingCacheConfig) -> Self {
        BlockingCache {
            delegate,
            locks: DashMap::new(),
            timeout_ms: AtomicU64::new(config.timeout_ms),
            release_on_remove: config.release_on_remove,
            _value: PhantomData,
        }
    }

    /// The wrapped store
    pub fn delegate(&self) -> &C {
        &self.delegate
    }

    /// Current lock timeout in milliseconds, `0` means no timeout
    pub fn timeout(&self) -> u64 {
        self.timeout_ms.load(Ordering::Acquire)
    }

    /// Change the lock timeout; applies to acquisitions starting afterwards
    pub fn set_timeout(&self, timeout_ms: u64) {
        self.timeout_ms.store(timeout_ms, Ordering::Release);
    }

    /// Release one hold of the calling thread on `key`.
    ///
    /// Returns `false` if the calling thread does not hold the key. This is the explicit way
    /// out for a thread that missed on a key and will not fill it.
    ///
    /// # Errors
    /// Returns [`Error::LockError`] if the lock state is poisoned.
    pub fn release(&self, key: &K) -> Result<bool> {
        self.release_lock(key)
    }

    /// Wake every thread waiting for `key` with [`Error::InterruptedWait`].
    ///
    /// The current holder keeps the lock.
    ///
    /// # Errors
    /// Returns [`Error::LockError`] if the lock state is poisoned.
    pub fn interrupt(&self, key: &K) -> Result<()> {
        match self.locks.get(key) {
            Some(lock) => lock.value().interrupt(),
            None => Ok(()),
        }
    }

    /// Returns true if the calling thread holds the lock of `key`
    ///
    /// # Errors
    /// Returns [`Error::LockError`] if the lock state is poisoned.
    pub fn is_held_by_current_thread(&self, key: &K) -> Result<bool> {
        match self.locks.get(key) {
            Some(lock) => lock.value().is_held_by_current_thread(),
            None => Ok(false),
        }
    }

    /// Number of key locks created so far
    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    fn lock_for_key(&self, key: &K) -> Arc<ReentrantKeyLock> {
        self.locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(ReentrantKeyLock::new()))
            .value()
            .clone()
    }

    fn acquire_lock(&self, key: &K) -> Result<()> {
        let lock = self.lock_for_key(key);
        let timeout_ms = self.timeout();

        let outcome = if timeout_ms > 0 {
            lock.try_lock_for(Duration::from_millis(timeout_ms))?
        } else {
            lock.lock()?
        };

        match outcome {
            WaitOutcome::Acquired => Ok(()),
            WaitOutcome::TimedOut => {
                warn!(key = ?key, cache = self.delegate.id(), timeout_ms, "key lock timed out");
                Err(Error::LockTimeout {
                    key: format!("{:?}", key),
                    cache: self.delegate.id().to_string(),
                    timeout_ms,
                })
            }
            WaitOutcome::Interrupted => {
                warn!(key = ?key, cache = self.delegate.id(), "key lock wait interrupted");
                Err(Error::InterruptedWait {
                    key: format!("{:?}", key),
                    cache: self.delegate.id().to_string(),
                })
            }
        }
    }

    fn release_lock(&self, key: &K) -> Result<bool> {
        let lock = match self.locks.get(key) {
            Some(lock) => lock.value().clone(),
            None => return Ok(false),
        };
        lock.unlock_if_held()
    }
}

impl<K, V, C> Cache<K, V> for BlockingCache<K, V, C>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    C: Cache<K, V>,
{
    fn id(&self) -> &str {
        self.delegate.id()
    }

    /// Write through, then release the calling thread's hold on `key` (if any)
    fn put(&self, key: K, value: V) -> Result<()> {
        let stored = self.delegate.put(key.clone(), value);
        self.release_lock(&key)?;
        stored
    }

    /// Acquire the key lock, then look up `key`.
    ///
    /// A hit releases the lock before returning. A miss returns `None` with the lock still
    /// held, and the caller is expected to `put` the value.
    fn get(&self, key: &K) -> Result<Option<V>> {
        self.acquire_lock(key)?;

        let value = match self.delegate.get(key) {
            Ok(value) => value,
            Err(error) => {
                self.release_lock(key)?;
                return Err(error);
            }
        };

        if value.is_some() {
            trace!(key = ?key, "blocking cache hit");
            self.release_lock(key)?;
        } else {
            trace!(key = ?key, "blocking cache miss, keeping key lock");
        }
        Ok(value)
    }

    fn remove(&self, key: &K) -> Result<Option<V>> {
        let removed = self.delegate.remove(key);
        if self.release_on_remove {
            self.release_lock(key)?;
        }
        removed
    }

    fn clear(&self) -> Result<()> {
        self.delegate.clear()
    }

    fn size(&self) -> usize {
        self.delegate.size()
    }
}
