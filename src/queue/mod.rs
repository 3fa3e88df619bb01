//! Topic/Queue Broker Component
//!
//! An in-process publish/subscribe broker. Producers and consumers exchange
//! typed messages through named topics, each topic backed by one or more
//! independent blocking queues.
//!
//! # Overview
//!
//! - **Topics**: value-typed channel names
//! - **Queues**: unbounded blocking FIFOs with per-queue fetch timeout
//! - **Registry**: one [`MessageQueueManager`] per message type mapping topics
//!   to the queues that receive their traffic
//! - **Fan-out**: a publish pushes one `Arc` handle onto every related queue
//! - **Safe unrelate**: a queue is only detached from a topic once it has drained
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   publish(topic)    ┌─────────────────────────────────┐
//! │  Producer A  │ ──────────────────▶ │ MessageQueueManager<T> (global) │
//! └──────────────┘                     │   "orders"   ─▶ [q1, q2]        │
//! ┌──────────────┐                     │   "payments" ─▶ [q3]            │
//! │  Producer B  │ ──────────────────▶ └───────┬─────────┬─────────┬─────┘
//! └──────────────┘                             │ push    │ push    │ push
//!                                              ▼         ▼         ▼
//!                                          ┌──────┐  ┌──────┐  ┌──────┐
//!                                          │  q1  │  │  q2  │  │  q3  │
//!                                          └──┬───┘  └──┬───┘  └──┬───┘
//!                                             │ wait    │ wait    │ wait
//!                                       ┌─────┴────┐ ┌──┴───────┐ │
//!                                       │Consumer A│ │Consumer B│◀┘
//!                                       └──────────┘ └──────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use relaymq::queue::{Consumer, IntMessage, Message, MessageQueueManager, Producer, Queue, Topic};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = Arc::new(MessageQueueManager::<IntMessage>::new());
//! let topic = Topic::new("orders");
//!
//! let billing = Arc::new(Queue::new("billing"));
//! let shipping = Arc::new(Queue::new("shipping"));
//! manager.relate(&topic, &billing)?;
//! manager.relate(&topic, &shipping)?;
//!
//! let mut producer = Producer::with_manager("shop", Arc::clone(&manager));
//! producer.subscribe(&topic)?;
//! assert_eq!(producer.publish(&topic, IntMessage::new(42))?, 2);
//!
//! let mut consumer = Consumer::with_manager("backoffice", Arc::clone(&manager));
//! consumer.subscribe(&topic)?;
//! let fetched = consumer.fetch(&topic)?;
//! assert!(fetched.iter().all(|m| m.content() == 42));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod api;
mod client;
mod consumer;
mod error;
mod internal;
mod manager;
mod message;
mod publisher;
mod subscription;
mod topic;
mod types;

pub use client::Client;
pub use consumer::Consumer;
pub use error::{MqError, MqResult};
pub use internal::{Queue, DEFAULT_DRAIN_TIMEOUT_MS};
pub use manager::MessageQueueManager;
pub use message::{DoubleMessage, Envelope, IntMessage, Message, Payload, StringMessage};
pub use publisher::Producer;
pub use topic::Topic;
pub use types::{QueueStats, RegistryStats};

#[cfg(test)]
mod tests;
