//! Consumer facade for fetching messages
//!
//! Consumers subscribe to topics and pull from every queue related to each
//! subscribed topic. Fetching blocks on each queue according to that queue's
//! own timeout.

use crate::queue::error::MqResult;
use crate::queue::internal::{requeue_all, Taken};
use crate::queue::manager::MessageQueueManager;
use crate::queue::message::Message;
use crate::queue::subscription::Subscriptions;
use crate::queue::topic::Topic;
use std::collections::HashMap;
use std::sync::Arc;

/// Consumer handle for reading messages from topics
///
/// Unlike a [`Producer`](crate::queue::Producer), a consumer may subscribe
/// before any queue is related to the topic; fetching then fails with
/// `UnknownTopic` until a relation exists.
///
/// # Example
///
/// ```rust
/// # use relaymq::queue::{Consumer, IntMessage, Message, MessageQueueManager, Queue, Topic};
/// # use std::sync::Arc;
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = Arc::new(MessageQueueManager::<IntMessage>::new());
/// let topic = Topic::new("jobs");
/// let queue = Arc::new(Queue::new("workers"));
/// manager.relate(&topic, &queue)?;
/// manager.publish(&topic, IntMessage::new(3))?;
///
/// let mut consumer = Consumer::with_manager("worker-1", Arc::clone(&manager));
/// consumer.subscribe(&topic)?;
///
/// let messages = consumer.fetch(&topic)?;
/// assert_eq!(messages[0].content(), 3);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct Consumer<T: Message> {
    subscriptions: Subscriptions,
    manager: Arc<MessageQueueManager<T>>,
}

impl<T: Message> Consumer<T> {
    /// Create a consumer bound to the global registry for `T`
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_manager(name, MessageQueueManager::instance())
    }

    pub fn with_manager(name: impl Into<String>, manager: Arc<MessageQueueManager<T>>) -> Self {
        Self {
            subscriptions: Subscriptions::new(name.into()),
            manager,
        }
    }

    /// Create a consumer already subscribed to `topics`
    pub fn with_topics(
        name: impl Into<String>,
        manager: Arc<MessageQueueManager<T>>,
        topics: &[Topic],
    ) -> MqResult<Self> {
        let mut consumer = Self::with_manager(name, manager);
        for topic in topics {
            consumer.subscribe(topic)?;
        }
        Ok(consumer)
    }

    pub fn name(&self) -> &str {
        self.subscriptions.owner()
    }

    pub fn subscribe(&mut self, topic: &Topic) -> MqResult<()> {
        self.subscriptions.add(topic)
    }

    pub fn unsubscribe(&mut self, topic: &Topic) -> MqResult<()> {
        self.subscriptions.remove(topic)
    }

    pub fn is_subscribed(&self, topic: &Topic) -> bool {
        self.subscriptions.contains(topic)
    }

    pub fn subscribed_topics(&self) -> Vec<Topic> {
        self.subscriptions.sorted()
    }

    /// Pop one message from every queue related to `topic`
    ///
    /// Blocks on each queue in turn. A queue timeout aborts the fetch with
    /// `QueueTimeout`, and messages already taken from earlier queues in the
    /// same call are put back at the head of their queues.
    pub fn fetch(&self, topic: &Topic) -> MqResult<Vec<Arc<T>>> {
        let mut taken = Taken::new();
        if let Err(e) = self.take(topic, &mut taken) {
            requeue_all(taken);
            return Err(e);
        }
        Ok(taken.into_iter().map(|(_, message)| message).collect())
    }

    /// [`fetch`](Self::fetch) for every subscribed topic
    ///
    /// All or nothing: if any topic fails, every message taken for the other
    /// topics is returned to its queue.
    pub fn fetch_all(&self) -> MqResult<HashMap<Topic, Vec<Arc<T>>>> {
        let mut taken = Taken::new();
        let mut fetched = HashMap::new();
        for topic in self.subscriptions.iter() {
            let start = taken.len();
            if let Err(e) = self.take(topic, &mut taken) {
                requeue_all(taken);
                return Err(e);
            }
            let messages = taken[start..]
                .iter()
                .map(|(_, message)| Arc::clone(message))
                .collect();
            fetched.insert(topic.clone(), messages);
        }
        Ok(fetched)
    }

    fn take(&self, topic: &Topic, taken: &mut Taken<T>) -> MqResult<()> {
        self.subscriptions.ensure(topic)?;
        for queue in self.manager.get_related_queues(topic)? {
            let message = queue.wait()?;
            taken.push((queue, message));
        }
        Ok(())
    }
}
