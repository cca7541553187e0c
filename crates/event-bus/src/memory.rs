//! In-memory event bus implementation.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio::sync::mpsc;

use crate::bus::{Delivery, EventBus, EventHandler, PublishAck};
use crate::error::{BusError, Result};

/// Default number of partitions per topic.
const DEFAULT_PARTITIONS: usize = 4;

struct StoredMessage {
    key: String,
    payload: serde_json::Value,
}

struct TopicState {
    /// One append-only log per partition. Offsets are log indexes.
    logs: Vec<Vec<StoredMessage>>,
    /// Per consumer group, one channel per partition.
    groups: HashMap<String, Vec<mpsc::UnboundedSender<Delivery>>>,
}

impl TopicState {
    fn new(partitions: usize) -> Self {
        Self {
            logs: (0..partitions).map(|_| Vec::new()).collect(),
            groups: HashMap::new(),
        }
    }
}

struct BusInner {
    topics: HashMap<String, TopicState>,
    fail_on_publish: bool,
}

/// In-process event bus with partitioned, per-key ordered delivery.
///
/// Each consumer group runs one sequential dispatch task per partition,
/// so deliveries sharing a key are handled in publish order while
/// different keys may be handled in parallel. Partition logs are
/// retained, and late subscribers replay from the earliest offset.
#[derive(Clone)]
pub struct InMemoryEventBus {
    partitions: usize,
    inner: Arc<Mutex<BusInner>>,
    in_flight: Arc<AtomicUsize>,
    drained: Arc<Notify>,
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::with_partitions(DEFAULT_PARTITIONS)
    }
}

impl InMemoryEventBus {
    /// Creates a bus with the default partition count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bus with an explicit partition count per topic.
    pub fn with_partitions(partitions: usize) -> Self {
        assert!(partitions > 0, "partition count must be positive");
        Self {
            partitions,
            inner: Arc::new(Mutex::new(BusInner {
                topics: HashMap::new(),
                fail_on_publish: false,
            })),
            in_flight: Arc::new(AtomicUsize::new(0)),
            drained: Arc::new(Notify::new()),
        }
    }

    /// Configures the bus to fail every publish until reset.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.inner.lock().unwrap().fail_on_publish = fail;
    }

    /// Returns the number of messages retained for a topic.
    pub fn message_count(&self, topic: &str) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .topics
            .get(topic)
            .map(|t| t.logs.iter().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Delivers an already-appended message to every consumer group again.
    ///
    /// Exercises the at-least-once contract: consumers have to cope with
    /// seeing the same offset twice.
    pub fn redeliver(&self, topic: &str, partition: usize, offset: u64) -> Result<()> {
        let inner = self.inner.lock().unwrap();
        let state = inner
            .topics
            .get(topic)
            .ok_or_else(|| BusError::UnknownTopic(topic.to_string()))?;
        let message = state
            .logs
            .get(partition)
            .and_then(|log| log.get(offset as usize))
            .ok_or(BusError::UnknownOffset {
                topic: topic.to_string(),
                partition,
                offset,
            })?;

        let delivery = Delivery {
            topic: topic.to_string(),
            key: message.key.clone(),
            partition,
            offset,
            payload: message.payload.clone(),
        };
        for senders in state.groups.values() {
            self.enqueue(&senders[partition], delivery.clone());
        }
        Ok(())
    }

    /// Waits until every enqueued delivery has been handled.
    ///
    /// Deliveries published from within a handler are counted before the
    /// triggering delivery completes, so cascades drain fully.
    pub async fn quiesce(&self) {
        loop {
            let notified = self.drained.notified();
            if self.in_flight.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    fn enqueue(&self, sender: &mpsc::UnboundedSender<Delivery>, delivery: Delivery) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        if sender.send(delivery).is_err() {
            // Subscription task is gone; nothing will handle this one.
            if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                self.drained.notify_waiters();
            }
        }
    }

    fn partition_for(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.partitions
    }

    fn spawn_dispatch_task(
        &self,
        handler: Arc<dyn EventHandler>,
        mut receiver: mpsc::UnboundedReceiver<Delivery>,
    ) {
        let in_flight = self.in_flight.clone();
        let drained = self.drained.clone();
        tokio::spawn(async move {
            while let Some(delivery) = receiver.recv().await {
                handler.handle(delivery).await;
                if in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                    drained.notify_waiters();
                }
            }
        });
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn publish(
        &self,
        topic: &str,
        key: &str,
        payload: serde_json::Value,
    ) -> Result<PublishAck> {
        let partition = self.partition_for(key);

        let mut inner = self.inner.lock().unwrap();
        if inner.fail_on_publish {
            return Err(BusError::PublishFailed {
                topic: topic.to_string(),
                key: key.to_string(),
                reason: "broker unavailable".to_string(),
            });
        }

        let partitions = self.partitions;
        let state = inner
            .topics
            .entry(topic.to_string())
            .or_insert_with(|| TopicState::new(partitions));

        let offset = state.logs[partition].len() as u64;
        state.logs[partition].push(StoredMessage {
            key: key.to_string(),
            payload: payload.clone(),
        });

        let delivery = Delivery {
            topic: topic.to_string(),
            key: key.to_string(),
            partition,
            offset,
            payload,
        };
        for senders in state.groups.values() {
            self.enqueue(&senders[partition], delivery.clone());
        }

        metrics::counter!("bus_messages_published_total").increment(1);
        tracing::debug!(topic, key, partition, offset, "message appended");

        Ok(PublishAck {
            topic: topic.to_string(),
            partition,
            offset,
        })
    }

    async fn subscribe(&self, topic: &str, consumer_group: &str, handler: Arc<dyn EventHandler>) {
        let mut inner = self.inner.lock().unwrap();
        let partitions = self.partitions;
        let state = inner
            .topics
            .entry(topic.to_string())
            .or_insert_with(|| TopicState::new(partitions));

        if state.groups.contains_key(consumer_group) {
            tracing::warn!(
                topic,
                consumer_group,
                "group already subscribed, replacing handler"
            );
        }

        let mut senders = Vec::with_capacity(self.partitions);
        for partition in 0..self.partitions {
            let (tx, rx) = mpsc::unbounded_channel();
            self.spawn_dispatch_task(handler.clone(), rx);

            // Replay retained messages so late subscribers start from the
            // earliest offset, then switch to live delivery.
            for (offset, message) in state.logs[partition].iter().enumerate() {
                self.enqueue(
                    &tx,
                    Delivery {
                        topic: topic.to_string(),
                        key: message.key.clone(),
                        partition,
                        offset: offset as u64,
                        payload: message.payload.clone(),
                    },
                );
            }
            senders.push(tx);
        }
        state.groups.insert(consumer_group.to_string(), senders);

        tracing::info!(topic, consumer_group, "subscribed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct RecordingHandler {
        seen: Arc<Mutex<Vec<Delivery>>>,
    }

    impl RecordingHandler {
        fn keys_and_offsets(&self) -> Vec<(String, u64)> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|d| (d.key.clone(), d.offset))
                .collect()
        }

        fn len(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, delivery: Delivery) {
            self.seen.lock().unwrap().push(delivery);
        }
    }

    #[tokio::test]
    async fn same_key_deliveries_arrive_in_publish_order() {
        let bus = InMemoryEventBus::new();
        let handler = RecordingHandler::default();
        bus.subscribe("orders", "group-a", Arc::new(handler.clone()))
            .await;

        for i in 0..10u64 {
            bus.publish("orders", "order-1", serde_json::json!({ "seq": i }))
                .await
                .unwrap();
        }
        bus.quiesce().await;

        let seen = handler.seen.lock().unwrap();
        let seqs: Vec<u64> = seen
            .iter()
            .filter(|d| d.key == "order-1")
            .map(|d| d.payload["seq"].as_u64().unwrap())
            .collect();
        assert_eq!(seqs, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn each_group_receives_every_message() {
        let bus = InMemoryEventBus::new();
        let first = RecordingHandler::default();
        let second = RecordingHandler::default();
        bus.subscribe("orders", "group-a", Arc::new(first.clone()))
            .await;
        bus.subscribe("orders", "group-b", Arc::new(second.clone()))
            .await;

        bus.publish("orders", "order-1", serde_json::json!({}))
            .await
            .unwrap();
        bus.publish("orders", "order-2", serde_json::json!({}))
            .await
            .unwrap();
        bus.quiesce().await;

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn late_subscriber_replays_retained_messages() {
        let bus = InMemoryEventBus::new();
        bus.publish("orders", "order-1", serde_json::json!({ "n": 1 }))
            .await
            .unwrap();
        bus.publish("orders", "order-1", serde_json::json!({ "n": 2 }))
            .await
            .unwrap();

        let handler = RecordingHandler::default();
        bus.subscribe("orders", "late-group", Arc::new(handler.clone()))
            .await;
        bus.quiesce().await;

        assert_eq!(
            handler.keys_and_offsets(),
            vec![("order-1".to_string(), 0), ("order-1".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn publish_ack_carries_partition_and_offset() {
        let bus = InMemoryEventBus::new();
        let first = bus
            .publish("orders", "order-1", serde_json::json!({}))
            .await
            .unwrap();
        let second = bus
            .publish("orders", "order-1", serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(first.topic, "orders");
        assert_eq!(second.partition, first.partition);
        assert_eq!(second.offset, first.offset + 1);
    }

    #[tokio::test]
    async fn fail_on_publish_returns_error_and_appends_nothing() {
        let bus = InMemoryEventBus::new();
        bus.set_fail_on_publish(true);

        let result = bus.publish("orders", "order-1", serde_json::json!({})).await;
        assert!(matches!(result, Err(BusError::PublishFailed { .. })));
        assert_eq!(bus.message_count("orders"), 0);

        bus.set_fail_on_publish(false);
        bus.publish("orders", "order-1", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(bus.message_count("orders"), 1);
    }

    #[tokio::test]
    async fn redeliver_duplicates_an_existing_offset() {
        let bus = InMemoryEventBus::new();
        let handler = RecordingHandler::default();
        bus.subscribe("orders", "group-a", Arc::new(handler.clone()))
            .await;

        let ack = bus
            .publish("orders", "order-1", serde_json::json!({}))
            .await
            .unwrap();
        bus.quiesce().await;
        assert_eq!(handler.len(), 1);

        bus.redeliver("orders", ack.partition, ack.offset).unwrap();
        bus.quiesce().await;
        assert_eq!(handler.len(), 2);
    }

    #[tokio::test]
    async fn redeliver_unknown_offset_is_an_error() {
        let bus = InMemoryEventBus::new();
        bus.publish("orders", "order-1", serde_json::json!({}))
            .await
            .unwrap();

        assert!(matches!(
            bus.redeliver("missing", 0, 0),
            Err(BusError::UnknownTopic(_))
        ));
        assert!(matches!(
            bus.redeliver("orders", 0, 99),
            Err(BusError::UnknownOffset { .. })
        ));
    }
}
