//! Type definitions for the queue system
//!
//! Point-in-time statistics snapshots. Values may be stale as soon as they
//! are returned.

/// Counters for a single queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStats {
    /// Queue name
    pub name: String,
    /// Messages currently waiting
    pub pending: usize,
    /// Total messages ever pushed
    pub pushed: u64,
    /// Total messages ever popped
    pub popped: u64,
    /// Number of `wait()` calls that timed out
    pub timeouts: u64,
}

/// Relation counts for a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryStats {
    /// Topics with at least one related queue
    pub topics: usize,
    /// Total (topic, queue) relations
    pub relations: usize,
}
