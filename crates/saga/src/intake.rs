//! Order intake: the entry point of the lifecycle.

use std::time::Duration;

use chrono::{DateTime, Utc};
use common::{OrderId, OrderItem};
use event_bus::EventBus;
use order_store::{OrderRecord, OrderStatus, OrderStore};
use serde::{Deserialize, Serialize};

use crate::error::IntakeError;
use crate::events::OrderCreatedEvent;
use crate::topics::Topics;

/// A create-order request as received at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub requested_at: DateTime<Utc>,
}

/// Creates pending orders and emits their creation events.
///
/// Creation succeeds from the caller's point of view as soon as the
/// pending record is stored; a failed event publish is logged and
/// swallowed, leaving the order to expire via its TTL. There is no
/// retry queue.
pub struct IntakeService<B, S> {
    bus: B,
    store: S,
    topics: Topics,
    pending_ttl: Duration,
}

impl<B: EventBus, S: OrderStore> IntakeService<B, S> {
    /// Creates an intake service writing pending orders with the given TTL.
    pub fn new(bus: B, store: S, topics: Topics, pending_ttl: Duration) -> Self {
        Self {
            bus,
            store,
            topics,
            pending_ttl,
        }
    }

    /// Validates the request, stores the order as `PENDING` and
    /// publishes `ORDER_CREATED`.
    ///
    /// Returns the stored record; its status is `PENDING` even when the
    /// publish failed.
    #[tracing::instrument(skip(self, request), fields(customer = %request.customer_name))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderRecord, IntakeError> {
        validate_request(&request)?;

        let order_id = OrderId::new();
        let created_at = Utc::now();
        tracing::info!(%order_id, customer = %request.customer_name, "creating order");

        let record = OrderRecord {
            order_id,
            customer_name: request.customer_name,
            items: request.items,
            requested_at: request.requested_at,
            created_at,
            status: OrderStatus::Pending,
        };
        self.store.put(record.clone(), Some(self.pending_ttl)).await?;
        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(
            %order_id,
            ttl_secs = self.pending_ttl.as_secs(),
            "order saved as PENDING"
        );

        let event = OrderCreatedEvent::from_record(&record);
        match serde_json::to_value(&event) {
            Ok(payload) => {
                match self
                    .bus
                    .publish(&self.topics.order_created, &order_id.to_string(), payload)
                    .await
                {
                    Ok(ack) => {
                        tracing::info!(
                            %order_id,
                            topic = %ack.topic,
                            partition = ack.partition,
                            offset = ack.offset,
                            "order created event published"
                        );
                    }
                    Err(err) => {
                        // The order stays PENDING until its TTL expires;
                        // there is no retry or compensation path.
                        tracing::error!(%order_id, error = %err, "failed to publish order created event");
                        metrics::counter!("orders_publish_failures_total").increment(1);
                    }
                }
            }
            Err(err) => {
                tracing::error!(%order_id, error = %err, "failed to serialize order created event");
            }
        }

        Ok(record)
    }
}

fn validate_request(request: &CreateOrderRequest) -> Result<(), IntakeError> {
    if request.customer_name.trim().is_empty() {
        return Err(IntakeError::BlankCustomerName);
    }
    if request.items.is_empty() {
        return Err(IntakeError::NoItems);
    }
    for item in &request.items {
        if item.quantity == 0 {
            return Err(IntakeError::NonPositiveQuantity {
                product_id: item.product_id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ProductCategory;
    use event_bus::InMemoryEventBus;
    use order_store::InMemoryOrderStore;

    fn service() -> (
        IntakeService<InMemoryEventBus, InMemoryOrderStore>,
        InMemoryEventBus,
        InMemoryOrderStore,
    ) {
        let bus = InMemoryEventBus::new();
        let store = InMemoryOrderStore::new();
        let service = IntakeService::new(
            bus.clone(),
            store.clone(),
            Topics::default(),
            Duration::from_secs(600),
        );
        (service, bus, store)
    }

    fn request(items: Vec<OrderItem>) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: "Alice".to_string(),
            items,
            requested_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_order_stores_pending_and_publishes() {
        let (service, bus, store) = service();

        let record = service
            .create_order(request(vec![OrderItem::new(
                "P1001",
                2,
                ProductCategory::Standard,
            )]))
            .await
            .unwrap();

        assert_eq!(record.status, OrderStatus::Pending);
        let stored = store.get(&record.order_id).await.unwrap().unwrap();
        assert_eq!(stored, record);
        assert_eq!(bus.message_count("order-created"), 1);
    }

    #[tokio::test]
    async fn blank_customer_name_is_rejected_before_any_state_exists() {
        let (service, bus, store) = service();

        let result = service
            .create_order(CreateOrderRequest {
                customer_name: "   ".to_string(),
                items: vec![OrderItem::new("P1001", 1, ProductCategory::Standard)],
                requested_at: Utc::now(),
            })
            .await;

        assert!(matches!(result, Err(IntakeError::BlankCustomerName)));
        assert!(store.is_empty().await);
        assert_eq!(bus.message_count("order-created"), 0);
    }

    #[tokio::test]
    async fn empty_item_list_is_rejected() {
        let (service, _, store) = service();
        let result = service.create_order(request(vec![])).await;
        assert!(matches!(result, Err(IntakeError::NoItems)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn zero_quantity_is_rejected() {
        let (service, _, store) = service();
        let result = service
            .create_order(request(vec![OrderItem::new(
                "P1001",
                0,
                ProductCategory::Standard,
            )]))
            .await;

        assert!(matches!(
            result,
            Err(IntakeError::NonPositiveQuantity { .. })
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn publish_failure_still_returns_the_pending_order() {
        let (service, bus, store) = service();
        bus.set_fail_on_publish(true);

        let record = service
            .create_order(request(vec![OrderItem::new(
                "P1001",
                2,
                ProductCategory::Standard,
            )]))
            .await
            .unwrap();

        // Known gap: the order is stuck PENDING with no retry; only the
        // TTL bounds how long it lingers.
        assert_eq!(record.status, OrderStatus::Pending);
        assert!(store.get(&record.order_id).await.unwrap().is_some());
        assert_eq!(bus.message_count("order-created"), 0);
    }
}
