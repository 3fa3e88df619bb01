//! Tests for Producer functionality

#[cfg(test)]
mod tests {
    use crate::queue::api::{
        IntMessage, Message, MessageQueueManager, MqError, Producer, Queue, StringMessage, Topic,
    };
    use serial_test::serial;
    use std::sync::Arc;

    fn manager_with(topics: &[&str]) -> (Arc<MessageQueueManager<IntMessage>>, Vec<Arc<Queue<IntMessage>>>) {
        let manager = Arc::new(MessageQueueManager::new());
        let queues = topics
            .iter()
            .map(|name| {
                let queue = Arc::new(Queue::new(format!("{}-queue", name)));
                manager.relate(&Topic::new(*name), &queue).unwrap();
                queue
            })
            .collect();
        (manager, queues)
    }

    #[test]
    fn test_subscribe_requires_related_topic() {
        let (manager, _queues) = manager_with(&["known"]);
        let mut producer = Producer::with_manager("p", manager);

        assert_eq!(
            producer.subscribe(&Topic::new("unknown")),
            Err(MqError::UnknownTopic {
                topic: "unknown".to_string()
            })
        );
        producer.subscribe(&Topic::new("known")).unwrap();
        assert!(producer.is_subscribed(&Topic::new("known")));
        assert!(!producer.is_subscribed(&Topic::new("unknown")));
    }

    #[test]
    fn test_subscribe_twice_fails() {
        let (manager, _queues) = manager_with(&["t"]);
        let mut producer = Producer::with_manager("p", manager);
        producer.subscribe(&Topic::new("t")).unwrap();

        assert!(matches!(
            producer.subscribe(&Topic::new("t")),
            Err(MqError::AlreadySubscribed { .. })
        ));
    }

    #[test]
    fn test_publish_requires_subscription() {
        let (manager, queues) = manager_with(&["t"]);
        let producer = Producer::with_manager("p", manager);

        assert_eq!(
            producer.publish(&Topic::new("t"), IntMessage::new(1)),
            Err(MqError::NotSubscribed {
                topic: "t".to_string(),
                subscriber: "p".to_string()
            })
        );
        assert!(queues[0].is_empty(), "Nothing should be published");
    }

    #[test]
    fn test_publish_and_unsubscribe() {
        let (manager, queues) = manager_with(&["t"]);
        let mut producer = Producer::with_manager("p", manager);
        let topic = Topic::new("t");
        producer.subscribe(&topic).unwrap();

        assert_eq!(producer.publish(&topic, IntMessage::new(10)).unwrap(), 1);
        assert_eq!(queues[0].wait().unwrap().content(), 10);

        producer.unsubscribe(&topic).unwrap();
        assert!(matches!(
            producer.unsubscribe(&topic),
            Err(MqError::NotSubscribed { .. })
        ));
        assert!(producer.publish(&topic, IntMessage::new(11)).is_err());
    }

    #[test]
    fn test_broadcast_reaches_every_subscribed_topic() {
        let (manager, queues) = manager_with(&["a", "b", "c"]);
        let producer = Producer::with_topics(
            "p",
            manager,
            &[Topic::new("a"), Topic::new("c")],
        )
        .unwrap();

        assert_eq!(producer.broadcast(IntMessage::new(5)).unwrap(), 2);
        assert_eq!(queues[0].size(), 1);
        assert!(queues[1].is_empty(), "Unsubscribed topic should get nothing");
        assert_eq!(queues[2].size(), 1);
    }

    #[test]
    fn test_broadcast_without_subscriptions() {
        let (manager, _queues) = manager_with(&["a"]);
        let producer = Producer::with_manager("lonely", manager);
        assert_eq!(
            producer.broadcast(IntMessage::new(1)),
            Err(MqError::NoSubscriptions {
                subscriber: "lonely".to_string()
            })
        );
    }

    #[test]
    fn test_subscriptions_are_per_producer() {
        let (manager, _queues) = manager_with(&["shared"]);
        let mut first = Producer::with_manager("first", Arc::clone(&manager));
        let second = Producer::with_manager("second", manager);
        first.subscribe(&Topic::new("shared")).unwrap();

        assert!(first.is_subscribed(&Topic::new("shared")));
        assert!(!second.is_subscribed(&Topic::new("shared")));
        assert_eq!(first.subscribed_topics(), vec![Topic::new("shared")]);
        assert_eq!(first.name(), "first");
    }

    #[test]
    fn test_publish_after_relation_removed() {
        let (manager, queues) = manager_with(&["gone"]);
        let mut producer = Producer::with_manager("p", Arc::clone(&manager));
        let topic = Topic::new("gone");
        producer.subscribe(&topic).unwrap();

        manager.unrelate(&topic, &queues[0]).unwrap();
        assert!(matches!(
            producer.publish(&topic, IntMessage::new(1)),
            Err(MqError::UnknownTopic { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_default_producer_uses_global_registry() {
        let manager = MessageQueueManager::<StringMessage>::instance();
        manager.flush();

        let topic = Topic::new("global-producer");
        let queue = Arc::new(Queue::new("global-producer-queue"));
        manager.relate(&topic, &queue).unwrap();

        let mut producer = Producer::<StringMessage>::new("global");
        producer.subscribe(&topic).unwrap();
        producer.publish(&topic, StringMessage::new("hi")).unwrap();

        assert_eq!(queue.wait().unwrap().content(), "hi");
        manager.flush();
    }
}
