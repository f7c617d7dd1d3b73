#![allow(unused_macros)]

/// Helper macro for locking items, mapping a poisoned mutex to [`crate::Error::LockError`]
///
/// ```rust, ignore
///  let mut state = lock!(self.state)?;
///  state.holds += 1;
/// ```
macro_rules! lock {
    ($lock:expr) => {
        $lock.lock().map_err(|_| crate::Error::LockError)
    };
}

/// Helper macro for waiting on a condition variable with an optional timeout
///
/// Expands to a `Result<(MutexGuard, bool)>` where the flag reports whether the wait timed
/// out. Without a timeout the flag is always `false`.
///
/// ```rust, ignore
///  let (state, timed_out) = wait!(self.condvar, state, Some(remaining))?;
/// ```
macro_rules! wait {
    ($condvar:expr, $guard:expr, $timeout:expr) => {
        match $timeout {
            Some(duration) => $condvar
                .wait_timeout($guard, duration)
                .map(|(guard, result)| (guard, result.timed_out()))
                .map_err(|_| crate::Error::LockError),
            None => $condvar
                .wait($guard)
                .map(|guard| (guard, false))
                .map_err(|_| crate::Error::LockError),
        }
    };
}
