//! MessageQueueManager - Central topic/queue registry
//!
//! The MessageQueueManager is the authoritative mapping from topics to the
//! queues that receive their traffic. There is one process-wide instance per
//! message type, created on first use, plus any number of private instances
//! built with [`MessageQueueManager::new`].

use crate::core::sync;
use crate::queue::error::{MqError, MqResult};
use crate::queue::internal::Queue;
use crate::queue::message::Message;
use crate::queue::topic::Topic;
use crate::queue::types::RegistryStats;
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock, Mutex, RwLock};
use std::time::{Duration, Instant};

type SingletonMap = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Global registry instances, keyed by message type
static REGISTRIES: LazyLock<Mutex<SingletonMap>> = LazyLock::new(|| {
    log::trace!("Initializing registry singleton map");
    Mutex::new(HashMap::new())
});

struct Relations<T> {
    topic_map: HashMap<Topic, Vec<Arc<Queue<T>>>>,
    known_topics: HashSet<Topic>,
}

/// Topic to queue registry for message type `T`
///
/// The MessageQueueManager is responsible for:
/// - Relating and unrelating queues to topics
/// - Fanning published messages out to every related queue
/// - Waiting for a queue to drain before its relation is removed
///
/// # Thread Safety
///
/// Relations live behind a single `RwLock`. `relate`, `unrelate` and `flush`
/// take the write lock; lookups and `publish` take the read lock, so a publish
/// never observes a half-applied relate or unrelate. Queue locks are only ever
/// taken while holding the registry lock, never the other way round.
///
/// # Example
///
/// ```rust
/// use relaymq::queue::{IntMessage, Message, MessageQueueManager, Queue, Topic};
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = MessageQueueManager::<IntMessage>::new();
/// let topic = Topic::new("numbers");
/// let queue = Arc::new(Queue::new("numbers-a"));
///
/// manager.relate(&topic, &queue)?;
/// manager.publish(&topic, IntMessage::new(7))?;
/// assert_eq!(queue.wait()?.content(), 7);
///
/// manager.unrelate(&topic, &queue)?;
/// assert!(!manager.is_related_any(&topic));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct MessageQueueManager<T> {
    relations: RwLock<Relations<T>>,
}

impl<T: Message> MessageQueueManager<T> {
    /// Create a private registry, independent of the global instance
    pub fn new() -> Self {
        Self {
            relations: RwLock::new(Relations {
                topic_map: HashMap::new(),
                known_topics: HashSet::new(),
            }),
        }
    }

    /// Get the process-wide registry for message type `T`
    ///
    /// Every call for the same `T` returns the same instance; concurrent first
    /// calls are serialized so only one instance is ever constructed.
    pub fn instance() -> Arc<Self> {
        let mut registries = sync::lock(&REGISTRIES, "registry singletons");
        let entry = registries.entry(TypeId::of::<T>()).or_insert_with(|| {
            log::debug!(
                "Creating registry instance for {}",
                std::any::type_name::<T>()
            );
            Arc::new(Self::new()) as Arc<dyn Any + Send + Sync>
        });

        match Arc::clone(entry).downcast::<Self>() {
            Ok(manager) => manager,
            Err(_) => panic!(
                "registry singleton for {} has the wrong type",
                std::any::type_name::<T>()
            ),
        }
    }

    /// Relate a queue to a topic
    ///
    /// Fails with `DuplicateRelation` if this exact queue handle is already
    /// related to the topic. Queues with equal names are still distinct.
    pub fn relate(&self, topic: &Topic, queue: &Arc<Queue<T>>) -> MqResult<()> {
        let mut relations = sync::write(&self.relations, "topic relations");
        let queues = relations.topic_map.entry(topic.clone()).or_default();

        if queues.iter().any(|q| Arc::ptr_eq(q, queue)) {
            return Err(MqError::DuplicateRelation {
                topic: topic.name().to_string(),
                queue: queue.name().to_string(),
            });
        }

        queues.push(Arc::clone(queue));
        relations.known_topics.insert(topic.clone());

        log::debug!("Related queue '{}' to topic '{}'", queue.name(), topic);
        Ok(())
    }

    /// Unrelate a queue from a topic once it has drained
    ///
    /// Waits up to the queue's drain timeout for pending messages to be
    /// consumed, without holding the registry lock. Removal then happens under
    /// the write lock and only if the queue is still empty; if publishers
    /// refilled it in between, the wait resumes with the remaining time.
    ///
    /// On timeout the relation is left in place and `DrainTimeout` is
    /// returned; the caller decides whether to retry.
    pub fn unrelate(&self, topic: &Topic, queue: &Arc<Queue<T>>) -> MqResult<()> {
        if !self.is_related(topic, queue) {
            return Err(Self::unknown_relation(topic, queue));
        }

        let drain_timeout_ms = queue.drain_timeout_ms();
        let deadline = Instant::now() + Duration::from_millis(u64::from(drain_timeout_ms));

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !queue.is_empty() {
                log::debug!(
                    "Waiting up to {:?} for queue '{}' to drain before unrelating from '{}'",
                    remaining,
                    queue.name(),
                    topic
                );
            }
            queue.wait_drained(remaining);

            {
                let mut relations = sync::write(&self.relations, "topic relations");
                let queues = relations
                    .topic_map
                    .get_mut(topic)
                    .ok_or_else(|| Self::unknown_relation(topic, queue))?;
                let position = queues
                    .iter()
                    .position(|q| Arc::ptr_eq(q, queue))
                    .ok_or_else(|| Self::unknown_relation(topic, queue))?;

                if queue.is_empty() {
                    queues.remove(position);
                    if queues.is_empty() {
                        relations.topic_map.remove(topic);
                        relations.known_topics.remove(topic);
                    }
                    log::debug!("Unrelated queue '{}' from topic '{}'", queue.name(), topic);
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                log::warn!(
                    "Queue '{}' still holds {} message(s) after {}ms; relation to '{}' kept",
                    queue.name(),
                    queue.size(),
                    drain_timeout_ms,
                    topic
                );
                return Err(MqError::DrainTimeout {
                    topic: topic.name().to_string(),
                    queue: queue.name().to_string(),
                    timeout_ms: drain_timeout_ms,
                });
            }
        }
    }

    /// Snapshot of the queues related to a topic
    pub fn get_related_queues(&self, topic: &Topic) -> MqResult<Vec<Arc<Queue<T>>>> {
        let relations = sync::read(&self.relations, "topic relations");
        relations
            .topic_map
            .get(topic)
            .filter(|queues| !queues.is_empty())
            .cloned()
            .ok_or_else(|| MqError::UnknownTopic {
                topic: topic.name().to_string(),
            })
    }

    pub fn is_related(&self, topic: &Topic, queue: &Arc<Queue<T>>) -> bool {
        let relations = sync::read(&self.relations, "topic relations");
        relations
            .topic_map
            .get(topic)
            .is_some_and(|queues| queues.iter().any(|q| Arc::ptr_eq(q, queue)))
    }

    pub fn is_related_any(&self, topic: &Topic) -> bool {
        let relations = sync::read(&self.relations, "topic relations");
        relations
            .topic_map
            .get(topic)
            .is_some_and(|queues| !queues.is_empty())
    }

    /// Snapshot of every topic with at least one related queue
    pub fn get_related_topics(&self) -> HashSet<Topic> {
        sync::read(&self.relations, "topic relations")
            .known_topics
            .clone()
    }

    /// Push one shared message onto every queue related to `topic`
    ///
    /// The read lock is held for the whole fan-out, so the set of queues
    /// reached is exactly the relation set at a single point in time.
    /// Returns the number of queues that received the message.
    pub fn publish(&self, topic: &Topic, message: impl Into<Arc<T>>) -> MqResult<usize> {
        let message = message.into();
        let relations = sync::read(&self.relations, "topic relations");
        let queues = relations
            .topic_map
            .get(topic)
            .filter(|queues| !queues.is_empty())
            .ok_or_else(|| MqError::UnknownTopic {
                topic: topic.name().to_string(),
            })?;

        for queue in queues {
            queue.push(Arc::clone(&message));
        }

        log::trace!("Published to topic '{}' ({} queue(s))", topic, queues.len());
        Ok(queues.len())
    }

    pub fn stats(&self) -> RegistryStats {
        let relations = sync::read(&self.relations, "topic relations");
        RegistryStats {
            topics: relations.known_topics.len(),
            relations: relations.topic_map.values().map(Vec::len).sum(),
        }
    }

    /// Clear every relation
    #[cfg(test)]
    pub fn flush(&self) {
        let mut relations = sync::write(&self.relations, "topic relations");
        relations.topic_map.clear();
        relations.known_topics.clear();
    }

    fn unknown_relation(topic: &Topic, queue: &Queue<T>) -> MqError {
        MqError::UnknownRelation {
            topic: topic.name().to_string(),
            queue: queue.name().to_string(),
        }
    }
}

impl<T: Message> Default for MessageQueueManager<T> {
    fn default() -> Self {
        Self::new()
    }
}
