//! Producer facade for publishing messages
//!
//! A Producer keeps its own list of subscribed topics and publishes through
//! the registry for its message type. Subscribing requires the topic to be
//! related to at least one queue already.

use crate::queue::error::{MqError, MqResult};
use crate::queue::manager::MessageQueueManager;
use crate::queue::message::Message;
use crate::queue::subscription::Subscriptions;
use crate::queue::topic::Topic;
use std::sync::Arc;

/// Publisher handle for sending messages to topics
///
/// # Example
///
/// ```rust
/// # use relaymq::queue::{MessageQueueManager, Producer, Queue, StringMessage, Topic};
/// # use std::sync::Arc;
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = Arc::new(MessageQueueManager::<StringMessage>::new());
/// let topic = Topic::new("alerts");
/// let queue = Arc::new(Queue::new("pager"));
/// manager.relate(&topic, &queue)?;
///
/// let mut producer = Producer::with_manager("monitor", Arc::clone(&manager));
/// producer.subscribe(&topic)?;
/// producer.publish(&topic, StringMessage::new("disk full"))?;
///
/// assert_eq!(queue.size(), 1);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct Producer<T: Message> {
    subscriptions: Subscriptions,
    manager: Arc<MessageQueueManager<T>>,
}

impl<T: Message> Producer<T> {
    /// Create a producer bound to the global registry for `T`
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_manager(name, MessageQueueManager::instance())
    }

    pub fn with_manager(name: impl Into<String>, manager: Arc<MessageQueueManager<T>>) -> Self {
        Self {
            subscriptions: Subscriptions::new(name.into()),
            manager,
        }
    }

    /// Create a producer already subscribed to `topics`
    pub fn with_topics(
        name: impl Into<String>,
        manager: Arc<MessageQueueManager<T>>,
        topics: &[Topic],
    ) -> MqResult<Self> {
        let mut producer = Self::with_manager(name, manager);
        for topic in topics {
            producer.subscribe(topic)?;
        }
        Ok(producer)
    }

    pub fn name(&self) -> &str {
        self.subscriptions.owner()
    }

    /// Subscribe to a topic that already has at least one related queue
    pub fn subscribe(&mut self, topic: &Topic) -> MqResult<()> {
        if !self.manager.is_related_any(topic) {
            return Err(MqError::UnknownTopic {
                topic: topic.name().to_string(),
            });
        }
        self.subscriptions.add(topic)
    }

    pub fn unsubscribe(&mut self, topic: &Topic) -> MqResult<()> {
        self.subscriptions.remove(topic)
    }

    pub fn is_subscribed(&self, topic: &Topic) -> bool {
        self.subscriptions.contains(topic)
    }

    /// Subscribed topics, sorted by name
    pub fn subscribed_topics(&self) -> Vec<Topic> {
        self.subscriptions.sorted()
    }

    /// Publish to every queue related to a subscribed topic
    ///
    /// Returns the number of queues that received the message.
    pub fn publish(&self, topic: &Topic, message: impl Into<Arc<T>>) -> MqResult<usize> {
        self.subscriptions.ensure(topic)?;
        self.manager.publish(topic, message)
    }

    /// Publish one message to every subscribed topic
    ///
    /// The same shared message lands in every related queue of every
    /// subscribed topic. Returns the total number of queues reached.
    pub fn broadcast(&self, message: impl Into<Arc<T>>) -> MqResult<usize> {
        self.subscriptions.ensure_any()?;
        let message = message.into();
        let mut delivered = 0;
        for topic in self.subscriptions.sorted() {
            delivered += self.manager.publish(&topic, Arc::clone(&message))?;
        }
        Ok(delivered)
    }
}
