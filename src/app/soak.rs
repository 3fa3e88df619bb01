//! Concurrency soak run
//!
//! Spawns producer and consumer threads against a private registry, publishes
//! `IntMessage`s `0..messages` round-robin over the configured topics and
//! checks that every related queue received each of its topic's values
//! exactly once, in per-producer order.

use crate::core::config::BrokerConfig;
use crate::queue::api::{
    Consumer, IntMessage, Message, MessageQueueManager, MqResult, Producer, Queue, QueueStats,
    RegistryStats, Topic,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Fetch timeout used when the configuration asks for blocking forever
///
/// A lost message would otherwise hang the run instead of failing it.
pub const SOAK_FETCH_TIMEOUT_MS: u32 = 10_000;

/// Delivery check for one queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueOutcome {
    pub topic: Topic,
    pub stats: QueueStats,
    pub expected: u64,
    pub received: u64,
    pub missing: u64,
    pub duplicated: u64,
    /// Values that belong to another topic
    pub unexpected: u64,
    /// Values that arrived before an earlier value from the same producer
    pub reordered: u64,
}

impl QueueOutcome {
    pub fn is_clean(&self) -> bool {
        self.missing == 0 && self.duplicated == 0 && self.unexpected == 0 && self.reordered == 0
    }
}

#[derive(Debug, Clone)]
pub struct SoakReport {
    pub messages: u64,
    pub producers: usize,
    pub consumers: usize,
    /// Sum of queues reached over all publishes
    pub deliveries: u64,
    /// Registry shape while the run was live
    pub registry: RegistryStats,
    pub outcomes: Vec<QueueOutcome>,
    pub elapsed: Duration,
}

impl SoakReport {
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(QueueOutcome::is_clean)
    }
}

type Received = HashMap<(usize, usize), Vec<i64>>;

/// Run a soak with the `[soak]` and `[queue]` settings of `config`
pub fn run_soak(config: &BrokerConfig) -> MqResult<SoakReport> {
    let soak = &config.soak;
    let topics = unique_topics(&soak.topics);
    let topic_count = topics.len();

    let mut queue_config = config.queue.clone();
    if queue_config.timeout_ms == 0 {
        queue_config.timeout_ms = SOAK_FETCH_TIMEOUT_MS;
    }

    let manager = Arc::new(MessageQueueManager::<IntMessage>::new());
    let mut layout: Vec<Vec<Arc<Queue<IntMessage>>>> = Vec::with_capacity(topic_count);
    for topic in &topics {
        let mut queues = Vec::with_capacity(soak.queues_per_topic);
        for j in 0..soak.queues_per_topic {
            let queue = Arc::new(Queue::with_config(format!("{}-{}", topic, j), &queue_config));
            manager.relate(topic, &queue)?;
            queues.push(queue);
        }
        layout.push(queues);
    }
    let registry = manager.stats();

    log::info!(
        "Soak: {} message(s), {} producer(s), {} consumer(s), {} topic(s) x {} queue(s)",
        soak.messages,
        soak.producers,
        soak.consumers,
        topic_count,
        soak.queues_per_topic
    );

    let start = Instant::now();

    let consumers: Vec<JoinHandle<MqResult<Received>>> = (0..soak.consumers)
        .map(|c| {
            let owned: Vec<usize> = (0..topic_count).filter(|t| t % soak.consumers == c).collect();
            let fetches: Vec<u64> = owned
                .iter()
                .map(|&t| share_of(soak.messages, topic_count, t))
                .collect();
            let topics = topics.clone();
            let manager = Arc::clone(&manager);
            thread::spawn(move || consume(c, manager, &topics, &owned, &fetches))
        })
        .collect();

    let producers: Vec<JoinHandle<MqResult<u64>>> = (0..soak.producers)
        .map(|p| {
            let topics = topics.clone();
            let manager = Arc::clone(&manager);
            let (messages, stride) = (soak.messages, soak.producers);
            thread::spawn(move || produce(p, manager, &topics, messages, stride))
        })
        .collect();

    let produced: Vec<MqResult<u64>> = producers.into_iter().map(join).collect();
    let consumed: Vec<MqResult<Received>> = consumers.into_iter().map(join).collect();
    let elapsed = start.elapsed();

    let mut deliveries = 0;
    for result in produced {
        deliveries += result?;
    }
    let mut received = Received::new();
    for result in consumed {
        received.extend(result?);
    }

    let mut outcomes = Vec::new();
    for (t, queues) in layout.iter().enumerate() {
        for (j, queue) in queues.iter().enumerate() {
            let values = received.remove(&(t, j)).unwrap_or_default();
            outcomes.push(check_queue(
                &topics[t],
                queue.stats(),
                &values,
                soak.messages,
                topic_count,
                t,
                soak.producers,
            ));
        }
    }

    for (topic, queues) in topics.iter().zip(&layout) {
        for queue in queues {
            manager.unrelate(topic, queue)?;
        }
    }

    let report = SoakReport {
        messages: soak.messages,
        producers: soak.producers,
        consumers: soak.consumers,
        deliveries,
        registry,
        outcomes,
        elapsed,
    };
    log::info!(
        "Soak finished in {:?}: {} delivery(ies), clean={}",
        report.elapsed,
        report.deliveries,
        report.is_clean()
    );
    Ok(report)
}

fn produce(
    index: usize,
    manager: Arc<MessageQueueManager<IntMessage>>,
    topics: &[Topic],
    messages: u64,
    stride: usize,
) -> MqResult<u64> {
    let producer = Producer::with_topics(format!("producer-{}", index), manager, topics)?;
    let mut deliveries = 0;
    for value in (index as u64..messages).step_by(stride) {
        let topic = &topics[(value % topics.len() as u64) as usize];
        deliveries += producer.publish(topic, IntMessage::new(value as i64))? as u64;
    }
    log::debug!("{} done: {} delivery(ies)", producer.name(), deliveries);
    Ok(deliveries)
}

fn consume(
    index: usize,
    manager: Arc<MessageQueueManager<IntMessage>>,
    topics: &[Topic],
    owned: &[usize],
    fetches: &[u64],
) -> MqResult<Received> {
    let subscribed: Vec<Topic> = owned.iter().map(|&t| topics[t].clone()).collect();
    let consumer = Consumer::with_topics(format!("consumer-{}", index), manager, &subscribed)?;

    let mut received = Received::new();
    for (&t, &count) in owned.iter().zip(fetches) {
        for _ in 0..count {
            for (j, message) in consumer.fetch(&topics[t])?.iter().enumerate() {
                received.entry((t, j)).or_default().push(message.content());
            }
        }
    }
    log::debug!("{} done: {} topic(s)", consumer.name(), owned.len());
    Ok(received)
}

fn join<R>(handle: JoinHandle<R>) -> R {
    match handle.join() {
        Ok(result) => result,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Topics in first-seen order with duplicates removed
fn unique_topics(names: &[String]) -> Vec<Topic> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .map(Topic::new)
        .collect()
}

/// How many of `0..messages` land on topic `t` under round-robin
fn share_of(messages: u64, topic_count: usize, t: usize) -> u64 {
    let topic_count = topic_count as u64;
    let t = t as u64;
    messages / topic_count + u64::from(t < messages % topic_count)
}

fn check_queue(
    topic: &Topic,
    stats: QueueStats,
    values: &[i64],
    messages: u64,
    topic_count: usize,
    t: usize,
    producers: usize,
) -> QueueOutcome {
    let expected = share_of(messages, topic_count, t);
    let belongs = |v: i64| v >= 0 && (v as u64) < messages && (v as u64 % topic_count as u64) == t as u64;

    let mut seen = HashSet::new();
    let mut duplicated = 0;
    let mut unexpected = 0;
    let mut reordered = 0;
    let mut last_by_producer: HashMap<u64, i64> = HashMap::new();

    for &value in values {
        if !belongs(value) {
            unexpected += 1;
            continue;
        }
        if !seen.insert(value) {
            duplicated += 1;
            continue;
        }
        let producer = value as u64 % producers as u64;
        if let Some(&last) = last_by_producer.get(&producer) {
            if value < last {
                reordered += 1;
            }
        }
        last_by_producer.insert(producer, value);
    }

    QueueOutcome {
        topic: topic.clone(),
        stats,
        expected,
        received: values.len() as u64,
        missing: expected - seen.len() as u64,
        duplicated,
        unexpected,
        reordered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(producers: usize, consumers: usize, messages: u64, topics: &[&str], queues: usize) -> BrokerConfig {
        let mut config = BrokerConfig::default();
        config.soak.producers = producers;
        config.soak.consumers = consumers;
        config.soak.messages = messages;
        config.soak.topics = topics.iter().map(|t| t.to_string()).collect();
        config.soak.queues_per_topic = queues;
        config
    }

    #[test]
    fn test_share_of_round_robin() {
        assert_eq!(share_of(10, 3, 0), 4);
        assert_eq!(share_of(10, 3, 1), 3);
        assert_eq!(share_of(10, 3, 2), 3);
        assert_eq!(share_of(0, 2, 0), 0);
    }

    #[test]
    fn test_unique_topics_keeps_order() {
        let names = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(unique_topics(&names), vec![Topic::new("b"), Topic::new("a")]);
    }

    #[test]
    fn test_check_queue_counts_faults() {
        let stats = Queue::<IntMessage>::new("q").stats();
        // Topic 0 of 2 over 0..8 expects 0, 2, 4, 6; one producer
        let outcome = check_queue(&Topic::new("t"), stats, &[0, 4, 2, 4, 3], 8, 2, 0, 1);
        assert_eq!(outcome.expected, 4);
        assert_eq!(outcome.received, 5);
        assert_eq!(outcome.missing, 1, "6 never arrived");
        assert_eq!(outcome.duplicated, 1);
        assert_eq!(outcome.unexpected, 1, "3 belongs to the other topic");
        assert_eq!(outcome.reordered, 1, "2 arrived after 4");
        assert!(!outcome.is_clean());
    }

    #[test]
    fn test_small_soak_is_clean() {
        let report = run_soak(&config(2, 2, 2_000, &["a", "b", "c"], 2)).unwrap();

        assert!(report.is_clean(), "Outcomes: {:#?}", report.outcomes);
        assert_eq!(report.outcomes.len(), 6);
        assert_eq!(report.deliveries, 4_000, "Every message reaches two queues");
        assert_eq!(report.registry.topics, 3);
        assert_eq!(report.registry.relations, 6);
        for outcome in &report.outcomes {
            assert_eq!(outcome.received, outcome.expected);
            assert_eq!(outcome.stats.pending, 0);
        }
    }

    #[test]
    fn test_more_consumers_than_topics() {
        let report = run_soak(&config(3, 5, 300, &["only"], 1)).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.outcomes[0].received, 300);
    }

    #[test]
    fn test_no_messages() {
        let report = run_soak(&config(1, 1, 0, &["idle"], 1)).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.deliveries, 0);
    }
}
