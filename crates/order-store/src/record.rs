//! The persisted order record and its lifecycle status.

use chrono::{DateTime, Utc};
use common::{OrderId, OrderItem};
use serde::{Deserialize, Serialize};

/// The lifecycle status of a stored order.
///
/// Transitions:
/// ```text
/// Pending ──┬──► Completed
///           └──► Rejected
/// ```
/// Both terminal states are final; no further lifecycle edits occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Stored at intake, awaiting the inventory check result.
    #[default]
    Pending,

    /// Inventory approved the order (terminal state).
    Completed,

    /// Inventory rejected the order (terminal state).
    Rejected,
}

impl OrderStatus {
    /// Returns true if this is a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Rejected)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The full order record as persisted in the store.
///
/// Writes are whole-record overwrites; the store has no partial-update
/// primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Globally unique order identifier, generated at intake.
    pub order_id: OrderId,
    /// Name of the ordering customer.
    pub customer_name: String,
    /// The ordered line items.
    pub items: Vec<OrderItem>,
    /// When the customer requested the order.
    pub requested_at: DateTime<Utc>,
    /// When intake created the record.
    pub created_at: DateTime<Utc>,
    /// Current lifecycle status.
    pub status: OrderStatus,
}

impl OrderRecord {
    /// Returns a copy of this record with the status replaced.
    ///
    /// All other fields are carried over unchanged, matching the
    /// full-overwrite terminal transition at finalization.
    pub fn with_status(&self, status: OrderStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}
