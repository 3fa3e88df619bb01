//! Tests for the per-type global registry instances

#[cfg(test)]
mod tests {
    use crate::queue::api::{
        IntMessage, Message, MessageQueueManager, Queue, StringMessage, Topic,
    };
    use serial_test::serial;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    #[serial]
    fn test_instance_is_per_type_singleton() {
        let a = MessageQueueManager::<IntMessage>::instance();
        let b = MessageQueueManager::<IntMessage>::instance();
        assert!(Arc::ptr_eq(&a, &b), "Same type should share one registry");

        a.flush();
        let topic = Topic::new("singleton");
        let queue = Arc::new(Queue::new("q"));
        a.relate(&topic, &queue).unwrap();
        assert!(b.is_related(&topic, &queue), "Relations are visible through every handle");

        let strings = MessageQueueManager::<StringMessage>::instance();
        assert!(
            !strings.is_related_any(&topic),
            "Registries for different types are independent"
        );
        a.flush();
    }

    #[test]
    #[serial]
    fn test_concurrent_first_calls_share_instance() {
        // Declared here so no other test can have created its registry
        #[derive(Debug)]
        struct Beacon(u8);

        impl Message for Beacon {
            type Content = u8;

            fn content(&self) -> u8 {
                self.0
            }

            fn set_content(&mut self, content: u8) {
                self.0 = content;
            }
        }

        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    MessageQueueManager::<Beacon>::instance()
                })
            })
            .collect();

        let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    }

    #[test]
    #[serial]
    fn test_flush_clears_global_relations() {
        let manager = MessageQueueManager::<IntMessage>::instance();
        manager.flush();

        let queue = Arc::new(Queue::new("q"));
        manager.relate(&Topic::new("x"), &queue).unwrap();
        manager.relate(&Topic::new("y"), &queue).unwrap();
        assert_eq!(manager.stats().topics, 2);

        manager.flush();
        assert_eq!(manager.stats().topics, 0);
        assert_eq!(manager.stats().relations, 0);
        assert!(manager.get_related_topics().is_empty());
    }

    #[test]
    fn test_private_instance_is_independent() {
        let private = MessageQueueManager::<IntMessage>::new();
        let queue = Arc::new(Queue::new("private-q"));
        private.relate(&Topic::new("private-only"), &queue).unwrap();

        assert!(!MessageQueueManager::<IntMessage>::instance().is_related_any(&Topic::new("private-only")));
    }
}
