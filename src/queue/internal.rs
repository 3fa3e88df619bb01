//! Internal blocking Queue implementation
//!
//! This module provides the queue engine behind every topic relation:
//! - Unbounded FIFO of `Arc`-wrapped messages so one publish can be shared
//!   between every related queue without copying
//! - Blocking pop with an optional per-queue timeout
//! - A separate "drained" signal raised whenever a pop empties the queue,
//!   which the registry waits on before removing a relation
//!
//! The FIFO and both condition variables share a single mutex. Counters and
//! timeout policy live in atomics outside of it.

use crate::core::config::QueueConfig;
use crate::core::sync;
use crate::queue::error::{MqError, MqResult};
use crate::queue::message::Message;
use crate::queue::types::QueueStats;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Default bound for the safe-unrelate drain wait
pub const DEFAULT_DRAIN_TIMEOUT_MS: u32 = 5000;

static NEXT_QUEUE_ID: AtomicU64 = AtomicU64::new(1);

/// Thread-safe blocking FIFO of messages of type `T`
///
/// Queues are shared through `Arc<Queue<T>>`: the owner keeps one handle and
/// the registry keeps one per related topic. Relation identity is the handle,
/// not the name, so two queues with the same name are still distinct.
///
/// # Example
///
/// ```rust
/// use relaymq::queue::{IntMessage, Message, Queue};
///
/// let queue = Queue::new("numbers");
/// queue.push(IntMessage::new(1));
/// queue.push(IntMessage::new(2));
///
/// assert_eq!(queue.size(), 2);
/// assert_eq!(queue.wait().unwrap().content(), 1);
/// assert_eq!(queue.try_wait().map(|m| m.content()), Some(2));
/// assert!(queue.try_wait().is_none());
/// ```
pub struct Queue<T> {
    name: String,
    items: Mutex<VecDeque<Arc<T>>>,
    /// Signalled once per push
    available: Condvar,
    /// Signalled when a pop leaves the queue empty
    drained: Condvar,
    timeout_ms: AtomicU32,
    drain_timeout_ms: AtomicU32,
    pushed: AtomicU64,
    popped: AtomicU64,
    timeouts: AtomicU64,
}

impl<T: Message> Queue<T> {
    /// Create a named queue that blocks indefinitely on `wait()`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
            drained: Condvar::new(),
            timeout_ms: AtomicU32::new(0),
            drain_timeout_ms: AtomicU32::new(DEFAULT_DRAIN_TIMEOUT_MS),
            pushed: AtomicU64::new(0),
            popped: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
        }
    }

    /// Create a queue with a generated name (`queue-<n>`)
    pub fn unnamed() -> Self {
        let id = NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed);
        Self::new(format!("queue-{}", id))
    }

    /// Create a named queue using the timeouts from configuration
    pub fn with_config(name: impl Into<String>, config: &QueueConfig) -> Self {
        let queue = Self::new(name);
        queue.set_timeout(config.timeout_ms);
        queue.set_drain_timeout(config.drain_timeout_ms);
        queue
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a message to the tail and wake one waiter
    pub fn push(&self, message: impl Into<Arc<T>>) {
        let message = message.into();
        let mut items = sync::lock(&self.items, &self.name);
        items.push_back(message);
        self.pushed.fetch_add(1, Ordering::Relaxed);
        self.available.notify_one();
    }

    /// Remove and return the head message, blocking until one is available
    ///
    /// With a zero timeout this blocks indefinitely. Otherwise it gives up
    /// after the configured number of milliseconds with `QueueTimeout`,
    /// leaving the queue untouched.
    pub fn wait(&self) -> MqResult<Arc<T>> {
        let timeout_ms = self.timeout_ms();
        let items = sync::lock(&self.items, &self.name);

        let mut items = if timeout_ms == 0 {
            sync::wait_while(&self.available, items, |items| items.is_empty(), &self.name)
        } else {
            let (items, _) = sync::wait_timeout_while(
                &self.available,
                items,
                Duration::from_millis(u64::from(timeout_ms)),
                |items| items.is_empty(),
                &self.name,
            );
            items
        };

        match self.pop_locked(&mut items) {
            Some(message) => Ok(message),
            None => {
                self.timeouts.fetch_add(1, Ordering::Relaxed);
                log::debug!("Queue '{}' fetch timed out after {}ms", self.name, timeout_ms);
                Err(MqError::QueueTimeout {
                    queue: self.name.clone(),
                    timeout_ms,
                })
            }
        }
    }

    /// Non-blocking pop
    pub fn try_wait(&self) -> Option<Arc<T>> {
        let mut items = sync::lock(&self.items, &self.name);
        self.pop_locked(&mut items)
    }

    /// Put a popped message back at the head
    ///
    /// Undoes a pop for fetches that fail part way, so the next fetch sees
    /// the message again in its original position.
    pub(crate) fn requeue(&self, message: Arc<T>) {
        let mut items = sync::lock(&self.items, &self.name);
        items.push_front(message);
        self.popped.fetch_sub(1, Ordering::Relaxed);
        self.available.notify_one();
    }

    /// Block until the queue is empty or `timeout` elapses
    ///
    /// Returns whether the queue was empty when the wait ended.
    pub fn wait_drained(&self, timeout: Duration) -> bool {
        let items = sync::lock(&self.items, &self.name);
        let (items, _) = sync::wait_timeout_while(
            &self.drained,
            items,
            timeout,
            |items| !items.is_empty(),
            &self.name,
        );
        items.is_empty()
    }

    pub fn size(&self) -> usize {
        sync::lock(&self.items, &self.name).len()
    }

    pub fn is_empty(&self) -> bool {
        sync::lock(&self.items, &self.name).is_empty()
    }

    /// Fetch timeout in milliseconds; 0 means wait forever
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms.load(Ordering::Acquire)
    }

    pub fn set_timeout(&self, timeout_ms: u32) {
        self.timeout_ms.store(timeout_ms, Ordering::Release);
    }

    /// Upper bound on the drain wait in `unrelate`; 0 means no wait
    pub fn drain_timeout_ms(&self) -> u32 {
        self.drain_timeout_ms.load(Ordering::Acquire)
    }

    pub fn set_drain_timeout(&self, timeout_ms: u32) {
        self.drain_timeout_ms.store(timeout_ms, Ordering::Release);
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            name: self.name.clone(),
            pending: self.size(),
            pushed: self.pushed.load(Ordering::Relaxed),
            popped: self.popped.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
        }
    }

    fn pop_locked(&self, items: &mut VecDeque<Arc<T>>) -> Option<Arc<T>> {
        let message = items.pop_front()?;
        self.popped.fetch_add(1, Ordering::Relaxed);
        if items.is_empty() {
            self.drained.notify_all();
        }
        Some(message)
    }
}

/// Messages popped by an in-progress fetch, paired with their source queue
pub(crate) type Taken<T> = Vec<(Arc<Queue<T>>, Arc<T>)>;

/// Return every message of an abandoned fetch to its queue, newest first
pub(crate) fn requeue_all<T: Message>(taken: Taken<T>) {
    if taken.is_empty() {
        return;
    }
    log::debug!("Returning {} message(s) from an incomplete fetch", taken.len());
    for (queue, message) in taken.into_iter().rev() {
        queue.requeue(message);
    }
}

impl<T> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.name)
            .field("timeout_ms", &self.timeout_ms.load(Ordering::Relaxed))
            .field(
                "drain_timeout_ms",
                &self.drain_timeout_ms.load(Ordering::Relaxed),
            )
            .finish_non_exhaustive()
    }
}
