//! Test modules for the broker
//!
//! Tests are organized by functional area. Most use private
//! `MessageQueueManager::new()` instances; the `manager` suite exercises the
//! global per-type singletons and runs serially.

mod manager;
mod publisher;
