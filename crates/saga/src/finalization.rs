//! Bus handler that finalizes orders from inventory check results.

use async_trait::async_trait;
use event_bus::{Delivery, EventHandler};
use order_store::{OrderStatus, OrderStore};

use crate::events::InventoryCheckResultEvent;

/// Consumes `INVENTORY_CHECK_RESULT` and transitions the stored order
/// to its terminal status.
///
/// The write is a full overwrite of the record with only the status
/// changed, and it clears the pending TTL. An order that expired before
/// the result arrived is logged and skipped; that lost update is
/// accepted, not an error. Redelivery of a result event rewrites the
/// same terminal record, so this side is duplicate-safe.
pub struct FinalizationWorker<S> {
    store: S,
}

impl<S: OrderStore> FinalizationWorker<S> {
    /// Creates a worker finalizing into the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: OrderStore + 'static> EventHandler for FinalizationWorker<S> {
    async fn handle(&self, delivery: Delivery) {
        let event: InventoryCheckResultEvent = match serde_json::from_value(delivery.payload) {
            Ok(event) => event,
            Err(err) => {
                tracing::error!(
                    topic = %delivery.topic,
                    key = %delivery.key,
                    error = %err,
                    "dropping malformed inventory check result event"
                );
                return;
            }
        };

        let order_id = event.order_id;
        tracing::info!(%order_id, approved = event.approved, "received inventory check result");

        let saved = match self.store.get(&order_id).await {
            Ok(saved) => saved,
            Err(err) => {
                tracing::error!(%order_id, error = %err, "failed to load order for finalization");
                return;
            }
        };
        let Some(saved) = saved else {
            // Expired or never stored; a silently accepted lost update.
            tracing::error!(%order_id, "order not found in store, skipping finalization");
            metrics::counter!("orders_finalization_misses_total").increment(1);
            return;
        };

        let new_status = if event.approved {
            OrderStatus::Completed
        } else {
            OrderStatus::Rejected
        };
        let updated = saved.with_status(new_status);

        match self.store.put(updated, None).await {
            Ok(()) => {
                tracing::info!(%order_id, status = %new_status, "order finalized");
                match new_status {
                    OrderStatus::Completed => {
                        metrics::counter!("orders_completed_total").increment(1);
                        tracing::info!(%order_id, "order confirmed");
                    }
                    OrderStatus::Rejected => {
                        metrics::counter!("orders_rejected_total").increment(1);
                        if let Some(missing) = &event.missing_items {
                            for item in missing {
                                tracing::info!(
                                    %order_id,
                                    product_id = %item.product_id,
                                    reason = %item.reason,
                                    "order rejected due to missing item"
                                );
                            }
                        }
                    }
                    OrderStatus::Pending => unreachable!("finalization only writes terminal statuses"),
                }
            }
            Err(err) => {
                tracing::error!(%order_id, error = %err, "failed to update order status");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{OrderId, OrderItem, ProductCategory};
    use event_bus::{EventBus, InMemoryEventBus};
    use inventory::InventoryCheckResult;
    use order_store::{InMemoryOrderStore, OrderRecord};
    use std::sync::Arc;
    use std::time::Duration;

    async fn setup() -> (InMemoryEventBus, InMemoryOrderStore) {
        let bus = InMemoryEventBus::new();
        let store = InMemoryOrderStore::new();
        let worker = FinalizationWorker::new(store.clone());
        bus.subscribe(
            "inventory-check-result",
            crate::topics::FINALIZATION_CONSUMER_GROUP,
            Arc::new(worker),
        )
        .await;
        (bus, store)
    }

    fn pending_record(order_id: OrderId) -> OrderRecord {
        OrderRecord {
            order_id,
            customer_name: "Alice".to_string(),
            items: vec![OrderItem::new("P1001", 2, ProductCategory::Standard)],
            requested_at: Utc::now(),
            created_at: Utc::now(),
            status: OrderStatus::Pending,
        }
    }

    fn result_event(order_id: OrderId, approved: bool) -> serde_json::Value {
        let event = InventoryCheckResultEvent::from_result(&InventoryCheckResult {
            order_id,
            approved,
            issues: vec![],
            validated_items: vec![],
        });
        serde_json::to_value(&event).unwrap()
    }

    async fn publish_result(bus: &InMemoryEventBus, order_id: OrderId, approved: bool) {
        bus.publish(
            "inventory-check-result",
            &order_id.to_string(),
            result_event(order_id, approved),
        )
        .await
        .unwrap();
        bus.quiesce().await;
    }

    #[tokio::test]
    async fn approved_result_completes_the_order() {
        let (bus, store) = setup().await;
        let order_id = OrderId::new();
        store
            .put(pending_record(order_id), Some(Duration::from_secs(600)))
            .await
            .unwrap();

        publish_result(&bus, order_id, true).await;

        let saved = store.get(&order_id).await.unwrap().unwrap();
        assert_eq!(saved.status, OrderStatus::Completed);
        assert_eq!(saved.customer_name, "Alice");
    }

    #[tokio::test]
    async fn rejected_result_rejects_the_order() {
        let (bus, store) = setup().await;
        let order_id = OrderId::new();
        store
            .put(pending_record(order_id), Some(Duration::from_secs(600)))
            .await
            .unwrap();

        publish_result(&bus, order_id, false).await;

        let saved = store.get(&order_id).await.unwrap().unwrap();
        assert_eq!(saved.status, OrderStatus::Rejected);
    }

    #[tokio::test]
    async fn missing_order_is_skipped_without_state_change() {
        let (bus, store) = setup().await;
        let order_id = OrderId::new();

        publish_result(&bus, order_id, true).await;

        assert!(store.get(&order_id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn duplicate_result_rewrites_the_same_terminal_status() {
        let (bus, store) = setup().await;
        let order_id = OrderId::new();
        store
            .put(pending_record(order_id), Some(Duration::from_secs(600)))
            .await
            .unwrap();

        publish_result(&bus, order_id, true).await;
        publish_result(&bus, order_id, true).await;

        let saved = store.get(&order_id).await.unwrap().unwrap();
        assert_eq!(saved.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn malformed_result_payload_is_dropped() {
        let (bus, store) = setup().await;
        bus.publish(
            "inventory-check-result",
            "bogus",
            serde_json::json!({ "approved": "not-a-bool" }),
        )
        .await
        .unwrap();
        bus.quiesce().await;

        assert!(store.is_empty().await);
    }
}
