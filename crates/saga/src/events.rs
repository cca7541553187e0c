//! Event payloads exchanged between the lifecycle services.
//!
//! Every payload carries a fixed `eventType` discriminator and an
//! `eventTimestamp`; consumers join only on `orderId`.

use chrono::{DateTime, Utc};
use common::{OrderId, OrderItem, ProductId};
use inventory::InventoryCheckResult;
use order_store::OrderRecord;
use serde::{Deserialize, Serialize};

/// Discriminator value of [`OrderCreatedEvent`].
pub const ORDER_CREATED_EVENT_TYPE: &str = "ORDER_CREATED";

/// Discriminator value of [`InventoryCheckResultEvent`].
pub const INVENTORY_CHECK_RESULT_EVENT_TYPE: &str = "INVENTORY_CHECK_RESULT";

/// Emitted once by intake after the pending order is stored.
///
/// Keyed by order ID on the bus, which guarantees ordering relative to
/// any later event of the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreatedEvent {
    pub order_id: OrderId,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub requested_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Lifecycle marker of the event itself, always `"CREATED"`.
    pub status: String,
    pub event_type: String,
    pub event_timestamp: DateTime<Utc>,
}

impl OrderCreatedEvent {
    /// Builds the creation event from the freshly stored record.
    pub fn from_record(record: &OrderRecord) -> Self {
        Self {
            order_id: record.order_id,
            customer_name: record.customer_name.clone(),
            items: record.items.clone(),
            requested_at: record.requested_at,
            created_at: record.created_at,
            status: "CREATED".to_string(),
            event_type: ORDER_CREATED_EVENT_TYPE.to_string(),
            event_timestamp: Utc::now(),
        }
    }
}

/// A rejected line summarized for the result event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingItem {
    pub product_id: ProductId,
    pub reason: String,
}

/// Emitted once by the validation worker after the check completes and
/// (for approved orders) stock has been decremented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCheckResultEvent {
    pub order_id: OrderId,
    /// `None` (serialized as null) for approved orders.
    #[serde(default)]
    pub missing_items: Option<Vec<MissingItem>>,
    pub approved: bool,
    pub event_type: String,
    pub event_timestamp: DateTime<Utc>,
}

impl InventoryCheckResultEvent {
    /// Builds the result event from the engine's verdict.
    ///
    /// Only the approved flag and the issue summaries travel onward;
    /// the per-line details stay local to the validation service.
    pub fn from_result(result: &InventoryCheckResult) -> Self {
        let missing_items = if result.approved {
            None
        } else {
            Some(
                result
                    .issues
                    .iter()
                    .map(|issue| MissingItem {
                        product_id: issue.product_id.clone(),
                        reason: issue.reason.clone(),
                    })
                    .collect(),
            )
        };

        Self {
            order_id: result.order_id,
            missing_items,
            approved: result.approved,
            event_type: INVENTORY_CHECK_RESULT_EVENT_TYPE.to_string(),
            event_timestamp: Utc::now(),
        }
    }
}
