//! Core bus trait and message types.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// A message delivered to a consumer group handler.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Topic the message was published to.
    pub topic: String,
    /// Partition key (the order ID for lifecycle events).
    pub key: String,
    /// Partition the key hashed to.
    pub partition: usize,
    /// Position within the partition.
    pub offset: u64,
    /// The serialized event payload.
    pub payload: serde_json::Value,
}

/// Acknowledgment returned once a published message has been appended.
///
/// Used only for logging, never for flow control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishAck {
    /// Topic the message was appended to.
    pub topic: String,
    /// Partition the key hashed to.
    pub partition: usize,
    /// Offset assigned within the partition.
    pub offset: u64,
}

/// Handler invoked for each delivery to a consumer group.
///
/// Handlers for the same key run serialized in publish order; handlers
/// for different keys may run concurrently. Implementations must not
/// assume exactly-once delivery.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Processes one delivery. Errors are the handler's own concern;
    /// the bus does not retry or dead-letter.
    async fn handle(&self, delivery: Delivery);
}

/// Trait for publish/subscribe bus implementations.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publishes a message to a topic under a partition key.
    ///
    /// Returns the acknowledgment once the message is appended. Delivery
    /// to subscribers happens asynchronously after the append.
    async fn publish(&self, topic: &str, key: &str, payload: serde_json::Value)
    -> Result<PublishAck>;

    /// Registers a handler for a topic on behalf of a consumer group.
    ///
    /// Each group receives every message of the topic once per publish
    /// (at least once under redelivery); distinct groups consume
    /// independently. Messages published before the subscription are
    /// replayed from the earliest retained offset.
    async fn subscribe(&self, topic: &str, consumer_group: &str, handler: Arc<dyn EventHandler>);
}
