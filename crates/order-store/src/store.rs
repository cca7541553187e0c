//! Core store trait.

use std::time::Duration;

use async_trait::async_trait;
use common::OrderId;

use crate::error::Result;
use crate::record::OrderRecord;

/// Trait for order store implementations.
///
/// The store is a plain key-value mapping from order ID to the full
/// record. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Writes a record, overwriting any existing one for the same order.
    ///
    /// A `ttl` of `Some(d)` makes the record expire after `d`; `None`
    /// persists it indefinitely and clears any TTL a previous write set.
    async fn put(&self, record: OrderRecord, ttl: Option<Duration>) -> Result<()>;

    /// Fetches a record by order ID.
    ///
    /// Returns `None` for unknown or expired orders; the two cases are
    /// indistinguishable to the caller.
    async fn get(&self, order_id: &OrderId) -> Result<Option<OrderRecord>>;

    /// Removes a record. Returns true if a live record was removed.
    async fn delete(&self, order_id: &OrderId) -> Result<bool>;
}
