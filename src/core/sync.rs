//! Synchronization utilities for robust lock handling
//!
//! Broker state is guarded by std locks. A poisoned lock means a thread
//! panicked mid-mutation, so the guarded invariants can no longer be trusted.
//! These helpers log the failure with the name of the guarded resource and
//! abort the calling operation with a panic carrying the same description.

use std::sync::{
    Condvar, LockResult, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
    WaitTimeoutResult,
};
use std::time::Duration;

fn poisoned<G>(result: LockResult<G>, kind: &str, resource: &str) -> G {
    match result {
        Ok(guard) => guard,
        Err(poison_err) => {
            log::error!(
                "Internal synchronisation error ({} poisoned) on {}: {:?}",
                kind,
                resource,
                poison_err
            );
            panic!(
                "{} on {} poisoned: a panic occurred while the lock was held",
                kind, resource
            );
        }
    }
}

/// Lock a mutex, treating poisoning as fatal
pub fn lock<'a, T>(mutex: &'a Mutex<T>, resource: &str) -> MutexGuard<'a, T> {
    poisoned(mutex.lock(), "Mutex", resource)
}

/// Acquire an RwLock for reading, treating poisoning as fatal
pub fn read<'a, T>(rwlock: &'a RwLock<T>, resource: &str) -> RwLockReadGuard<'a, T> {
    poisoned(rwlock.read(), "RwLock read", resource)
}

/// Acquire an RwLock for writing, treating poisoning as fatal
pub fn write<'a, T>(rwlock: &'a RwLock<T>, resource: &str) -> RwLockWriteGuard<'a, T> {
    poisoned(rwlock.write(), "RwLock write", resource)
}

/// Wait on a condition variable until `condition` returns false
pub fn wait_while<'a, T, F>(
    cond: &Condvar,
    guard: MutexGuard<'a, T>,
    condition: F,
    resource: &str,
) -> MutexGuard<'a, T>
where
    F: FnMut(&mut T) -> bool,
{
    poisoned(cond.wait_while(guard, condition), "Mutex", resource)
}

/// Bounded variant of [`wait_while`]
pub fn wait_timeout_while<'a, T, F>(
    cond: &Condvar,
    guard: MutexGuard<'a, T>,
    timeout: Duration,
    condition: F,
    resource: &str,
) -> (MutexGuard<'a, T>, WaitTimeoutResult)
where
    F: FnMut(&mut T) -> bool,
{
    poisoned(
        cond.wait_timeout_while(guard, timeout, condition),
        "Mutex",
        resource,
    )
}
