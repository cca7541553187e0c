//! Bus handler that validates created orders against the catalog.

use async_trait::async_trait;
use event_bus::{Delivery, EventBus, EventHandler};
use inventory::{InventoryValidator, ProductCatalog};

use crate::events::{InventoryCheckResultEvent, OrderCreatedEvent};
use crate::topics::Topics;

/// Consumes `ORDER_CREATED`, runs the validation engine and emits
/// `INVENTORY_CHECK_RESULT`.
///
/// For approved orders the catalog decrement happens before the result
/// event is published. Failures never propagate to the bus: malformed
/// payloads are dropped and publish errors are swallowed, both with an
/// error log.
///
/// Processing is not idempotent: a redelivered creation event
/// re-validates the order and can decrement stock a second time. The
/// result consumer side is idempotent, so the asymmetry is inherited
/// from the design rather than patched here.
pub struct ValidationWorker<C, B> {
    validator: InventoryValidator<C>,
    bus: B,
    topics: Topics,
}

impl<C: ProductCatalog, B: EventBus> ValidationWorker<C, B> {
    /// Creates a worker validating against the given catalog.
    pub fn new(catalog: C, bus: B, topics: Topics) -> Self {
        Self {
            validator: InventoryValidator::new(catalog),
            bus,
            topics,
        }
    }
}

#[async_trait]
impl<C, B> EventHandler for ValidationWorker<C, B>
where
    C: ProductCatalog + 'static,
    B: EventBus + 'static,
{
    async fn handle(&self, delivery: Delivery) {
        let event: OrderCreatedEvent = match serde_json::from_value(delivery.payload) {
            Ok(event) => event,
            Err(err) => {
                tracing::error!(
                    topic = %delivery.topic,
                    key = %delivery.key,
                    error = %err,
                    "dropping malformed order created event"
                );
                return;
            }
        };

        tracing::info!(
            order_id = %event.order_id,
            items = event.items.len(),
            status = %event.status,
            "received order created event"
        );

        let result = self.validator.validate(event.order_id, &event.items).await;
        if result.approved {
            // Stock must be decremented before the result is visible to
            // the finalization side.
            self.validator.commit(&result).await;
            tracing::info!(order_id = %event.order_id, "order processed, inventory updated");
        } else {
            tracing::warn!(order_id = %event.order_id, "order rejected, inventory unchanged");
        }

        let result_event = InventoryCheckResultEvent::from_result(&result);
        let payload = match serde_json::to_value(&result_event) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(order_id = %event.order_id, error = %err, "failed to serialize check result event");
                return;
            }
        };
        match self
            .bus
            .publish(
                &self.topics.inventory_check_result,
                &event.order_id.to_string(),
                payload,
            )
            .await
        {
            Ok(_) => {
                tracing::info!(order_id = %event.order_id, "inventory check result event published");
            }
            Err(err) => {
                // The catalog may already be decremented at this point;
                // nothing rolls that back. The pending order will expire.
                tracing::error!(order_id = %event.order_id, error = %err, "failed to publish inventory check result event");
                metrics::counter!("orders_publish_failures_total").increment(1);
            }
        }
    }
}
