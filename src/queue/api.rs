//! Public API for the queue system
//!
//! External modules should import from here rather than directly from internal modules.
//! See module documentation for complete usage examples and architecture details.

// Core broker components
pub use crate::queue::internal::{Queue, DEFAULT_DRAIN_TIMEOUT_MS};
pub use crate::queue::manager::MessageQueueManager;
pub use crate::queue::topic::Topic;

// Facades
pub use crate::queue::client::Client;
pub use crate::queue::consumer::Consumer;
pub use crate::queue::publisher::Producer;

// Message types and utilities
pub use crate::queue::message::{
    DoubleMessage, Envelope, IntMessage, Message, Payload, StringMessage,
};

// Error handling
pub use crate::queue::error::{MqError, MqResult};

// Statistics
pub use crate::queue::types::{QueueStats, RegistryStats};
