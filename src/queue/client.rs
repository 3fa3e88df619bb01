//! Client facade combining publish and fetch
//!
//! A Client plays both roles on one subscription list. Its fetches never
//! block: each related queue contributes its head message if it has one.

use crate::queue::error::MqResult;
use crate::queue::internal::{requeue_all, Taken};
use crate::queue::manager::MessageQueueManager;
use crate::queue::message::Message;
use crate::queue::subscription::Subscriptions;
use crate::queue::topic::Topic;
use std::collections::HashMap;
use std::sync::Arc;

/// Publish/fetch handle over a single subscription list
pub struct Client<T: Message> {
    subscriptions: Subscriptions,
    manager: Arc<MessageQueueManager<T>>,
}

impl<T: Message> Client<T> {
    /// Create a client bound to the global registry for `T`
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_manager(name, MessageQueueManager::instance())
    }

    pub fn with_manager(name: impl Into<String>, manager: Arc<MessageQueueManager<T>>) -> Self {
        Self {
            subscriptions: Subscriptions::new(name.into()),
            manager,
        }
    }

    pub fn with_topics(
        name: impl Into<String>,
        manager: Arc<MessageQueueManager<T>>,
        topics: &[Topic],
    ) -> MqResult<Self> {
        let mut client = Self::with_manager(name, manager);
        for topic in topics {
            client.subscribe(topic)?;
        }
        Ok(client)
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

    pub fn publish(&self, topic: &Topic, message: impl Into<Arc<T>>) -> MqResult<usize> {
        self.subscriptions.ensure(topic)?;
        self.manager.publish(topic, message)
    }

    /// Publish one message to every subscribed topic
    pub fn broadcast(&self, message: impl Into<Arc<T>>) -> MqResult<usize> {
        self.subscriptions.ensure_any()?;
        let message = message.into();
        let mut delivered = 0;
        for topic in self.subscriptions.sorted() {
            delivered += self.manager.publish(&topic, Arc::clone(&message))?;
        }
        Ok(delivered)
    }

    /// Take the head message of every queue related to `topic`, skipping empty ones
    pub fn fetch(&self, topic: &Topic) -> MqResult<Vec<Arc<T>>> {
        let mut taken = Taken::new();
        self.take(topic, &mut taken)?;
        Ok(taken.into_iter().map(|(_, message)| message).collect())
    }

    /// Non-blocking fetch across all subscribed topics
    ///
    /// Topics whose queues were all empty map to an empty vector. If any
    /// topic fails, messages already taken for the others go back to their
    /// queues.
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
            if let Some(message) = queue.try_wait() {
                taken.push((queue, message));
            }
        }
        Ok(())
    }
}
