//! Per-facade subscription list
//!
//! Each Producer, Consumer and Client owns one of these. Lists are never
//! shared between facade instances, even when they name the same topics.

use crate::queue::error::{MqError, MqResult};
use crate::queue::topic::Topic;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub(crate) struct Subscriptions {
    owner: String,
    topics: HashSet<Topic>,
}

impl Subscriptions {
    pub(crate) fn new(owner: String) -> Self {
        Self {
            owner,
            topics: HashSet::new(),
        }
    }

    pub(crate) fn owner(&self) -> &str {
        &self.owner
    }

    pub(crate) fn add(&mut self, topic: &Topic) -> MqResult<()> {
        if !self.topics.insert(topic.clone()) {
            return Err(MqError::AlreadySubscribed {
                topic: topic.name().to_string(),
                subscriber: self.owner.clone(),
            });
        }
        log::debug!("'{}' subscribed to topic '{}'", self.owner, topic);
        Ok(())
    }

    pub(crate) fn remove(&mut self, topic: &Topic) -> MqResult<()> {
        if !self.topics.remove(topic) {
            return Err(self.not_subscribed(topic));
        }
        log::debug!("'{}' unsubscribed from topic '{}'", self.owner, topic);
        Ok(())
    }

    /// Fail with `NotSubscribed` unless `topic` is in the list
    pub(crate) fn ensure(&self, topic: &Topic) -> MqResult<()> {
        if self.topics.contains(topic) {
            Ok(())
        } else {
            Err(self.not_subscribed(topic))
        }
    }

    /// Fail with `NoSubscriptions` when the list is empty
    pub(crate) fn ensure_any(&self) -> MqResult<()> {
        if self.topics.is_empty() {
            Err(MqError::NoSubscriptions {
                subscriber: self.owner.clone(),
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn contains(&self, topic: &Topic) -> bool {
        self.topics.contains(topic)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    /// Subscribed topics sorted by name
    pub(crate) fn sorted(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = self.topics.iter().cloned().collect();
        topics.sort();
        topics
    }

    fn not_subscribed(&self, topic: &Topic) -> MqError {
        MqError::NotSubscribed {
            topic: topic.name().to_string(),
            subscriber: self.owner.clone(),
        }
    }
}
