//! Synchronization primitives for the blocking cache.
//!
//! # Key Components
//!
//! - [`ReentrantKeyLock`] - An owner-tracking, reentrant lock with timed and interruptible
//!   acquisition
//!
//! The standard library's `Mutex` ties unlocking to a guard on the same stack frame. The
//! blocking cache acquires a key lock in one call (`get`) and releases it in another (`put`),
//! so ownership has to be tracked explicitly by thread id.

use std::{
    sync::{Condvar, Mutex},
    thread::{self, ThreadId},
    time::{Duration, Instant},
};

use crate::Result;

/// Outcome of an acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WaitOutcome {
    /// The calling thread now holds the lock
    Acquired,
    /// The timeout elapsed, the lock is not held
    TimedOut,
    /// [`ReentrantKeyLock::interrupt`] was called while waiting, the lock is not held
    Interrupted,
}

struct LockState {
    /// Thread currently holding the lock
    owner: Option<ThreadId>,
    /// Number of holds of the owner
    holds: usize,
    /// Bumped on every interrupt; waiters compare against the value seen when they started
    interrupts: u64,
}

/// A reentrant lock whose holder is tracked by thread id.
///
/// The owning thread may acquire it again, each acquisition adds a hold and each
/// [`ReentrantKeyLock::unlock_if_held`] removes one. Other threads block until the hold count
/// drops to zero, the timeout elapses, or the lock is interrupted.
///
/// # Examples
///
/// ```rust,ignore
/// let lock = ReentrantKeyLock::new();
/// assert_eq!(lock.lock()?, WaitOutcome::Acquired);
/// assert_eq!(lock.lock()?, WaitOutcome::Acquired);
/// assert!(lock.unlock_if_held()?);
/// assert!(lock.is_held_by_current_thread()?);
/// assert!(lock.unlock_if_held()?);
/// assert!(!lock.is_held_by_current_thread()?);
/// ```
pub(crate) struct ReentrantKeyLock {
    state: Mutex<LockState>,
    condvar: Condvar,
}

impl ReentrantKeyLock {
    /// Creates a new, unheld lock.
    pub fn new() -> Self {
        ReentrantKeyLock {
            state: Mutex::new(LockState {
                owner: None,
                holds: 0,
                interrupts: 0,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Block until the lock is acquired or the wait is interrupted.
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the internal state is poisoned.
    pub fn lock(&self) -> Result<WaitOutcome> {
        self.acquire(None)
    }

    /// Wait at most `timeout` for the lock.
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the internal state is poisoned.
    pub fn try_lock_for(&self, timeout: Duration) -> Result<WaitOutcome> {
        self.acquire(Some(timeout))
    }

    fn acquire(&self, timeout: Option<Duration>) -> Result<WaitOutcome> {
        let me = thread::current().id();
        let deadline = timeout.map(|t| Instant::now() + t);

        let mut state = lock!(self.state)?;
        if state.owner == Some(me) {
            state.holds += 1;
            return Ok(WaitOutcome::Acquired);
        }

        let epoch = state.interrupts;
        loop {
            if state.interrupts != epoch {
                return Ok(WaitOutcome::Interrupted);
            }
            if state.owner.is_none() {
                state.owner = Some(me);
                state.holds = 1;
                return Ok(WaitOutcome::Acquired);
            }

            let remaining = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(WaitOutcome::TimedOut);
                    }
                    Some(deadline - now)
                }
                None => None,
            };

            let (guard, _timed_out) = wait!(self.condvar, state, remaining)?;
            state = guard;
        }
    }

    /// Release one hold if the calling thread owns the lock.
    ///
    /// Returns `false` (and does nothing) when the caller is not the owner.
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the internal state is poisoned.
    pub fn unlock_if_held(&self) -> Result<bool> {
        let mut state = lock!(self.state)?;
        if state.owner != Some(thread::current().id()) {
            return Ok(false);
        }

        state.holds -= 1;
        if state.holds == 0 {
            state.owner = None;
            self.condvar.notify_all();
        }
        Ok(true)
    }

    /// Wake every thread currently waiting for this lock with [`WaitOutcome::Interrupted`].
    ///
    /// The holder, if any, keeps the lock. Threads starting to wait afterwards are not affected.
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the internal state is poisoned.
    pub fn interrupt(&self) -> Result<()> {
        let mut state = lock!(self.state)?;
        state.interrupts = state.interrupts.wrapping_add(1);
        self.condvar.notify_all();
        Ok(())
    }

    /// Returns true if the calling thread holds the lock
    pub fn is_held_by_current_thread(&self) -> Result<bool> {
        Ok(lock!(self.state)?.owner == Some(thread::current().id()))
    }

    /// Number of holds of the calling thread (zero if another thread owns the lock)
    #[cfg(test)]
    pub fn hold_count(&self) -> Result<usize> {
        let state = lock!(self.state)?;
        if state.owner == Some(thread::current().id()) {
            Ok(state.holds)
        } else {
            Ok(0)
        }
    }

    /// Returns true if any thread holds the lock
    #[cfg(test)]
    pub fn is_locked(&self) -> Result<bool> {
        Ok(lock!(self.state)?.owner.is_some())
    }
}

impl Default for ReentrantKeyLock {
    fn default() -> Self {
        Self::new()
    }
}
