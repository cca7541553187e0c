//! In-memory order store implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::OrderId;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::Result;
use crate::record::OrderRecord;
use crate::store::OrderStore;

/// Default key prefix. One observed deployment uses `"order:pending:"`
/// instead; the prefix is configuration, not contract.
pub const DEFAULT_KEY_PREFIX: &str = "order:";

struct Entry {
    record: OrderRecord,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// In-memory order store with lazy TTL expiry.
///
/// Expired entries are dropped on the next read that touches them, the
/// same observable behavior a Redis-backed store would give.
#[derive(Clone)]
pub struct InMemoryOrderStore {
    prefix: String,
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

impl InMemoryOrderStore {
    /// Creates a store with the default key prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with an explicit key prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of live (unexpired) records.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    /// Returns true if the store holds no live records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn key(&self, order_id: &OrderId) -> String {
        format!("{}{}", self.prefix, order_id)
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn put(&self, record: OrderRecord, ttl: Option<Duration>) -> Result<()> {
        let key = self.key(&record.order_id);
        let expires_at = ttl.map(|d| Instant::now() + d);

        tracing::debug!(
            order_id = %record.order_id,
            status = %record.status,
            ttl_secs = ttl.map(|d| d.as_secs()),
            "storing order record"
        );

        self.entries
            .write()
            .await
            .insert(key, Entry { record, expires_at });
        Ok(())
    }

    async fn get(&self, order_id: &OrderId) -> Result<Option<OrderRecord>> {
        let key = self.key(order_id);
        let now = Instant::now();

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => {
                    return Ok(Some(entry.record.clone()));
                }
                Some(_) => {}
            }
        }

        // The entry expired; evict it under the write lock. Re-check in
        // case a concurrent put replaced it in between.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(&key) {
            if entry.is_expired(Instant::now()) {
                entries.remove(&key);
            } else {
                return Ok(Some(entry.record.clone()));
            }
        }
        Ok(None)
    }

    async fn delete(&self, order_id: &OrderId) -> Result<bool> {
        let key = self.key(order_id);
        let now = Instant::now();
        let removed = self.entries.write().await.remove(&key);
        Ok(removed.is_some_and(|e| !e.is_expired(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OrderStatus;
    use chrono::Utc;
    use common::{OrderItem, ProductCategory};

    fn sample_record(order_id: OrderId) -> OrderRecord {
        OrderRecord {
            order_id,
            customer_name: "Alice".to_string(),
            items: vec![OrderItem::new("P1001", 2, ProductCategory::Standard)],
            requested_at: Utc::now(),
            created_at: Utc::now(),
            status: OrderStatus::Pending,
        }
    }

    #[tokio::test]
    async fn put_then_get_returns_the_record() {
        let store = InMemoryOrderStore::new();
        let order_id = OrderId::new();
        store.put(sample_record(order_id), None).await.unwrap();

        let found = store.get(&order_id).await.unwrap().unwrap();
        assert_eq!(found.order_id, order_id);
        assert_eq!(found.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn get_unknown_order_returns_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.get(&OrderId::new()).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn record_expires_after_ttl() {
        let store = InMemoryOrderStore::new();
        let order_id = OrderId::new();
        store
            .put(sample_record(order_id), Some(Duration::from_secs(600)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(599)).await;
        assert!(store.get(&order_id).await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(store.get(&order_id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn overwrite_without_ttl_clears_the_ttl() {
        let store = InMemoryOrderStore::new();
        let order_id = OrderId::new();
        let record = sample_record(order_id);
        store
            .put(record.clone(), Some(Duration::from_secs(60)))
            .await
            .unwrap();

        // Terminal transition: full overwrite, no TTL.
        store
            .put(record.with_status(OrderStatus::Completed), None)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(3600)).await;
        let found = store.get(&order_id).await.unwrap().unwrap();
        assert_eq!(found.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = InMemoryOrderStore::new();
        let order_id = OrderId::new();
        store.put(sample_record(order_id), None).await.unwrap();

        assert!(store.delete(&order_id).await.unwrap());
        assert!(store.get(&order_id).await.unwrap().is_none());
        assert!(!store.delete(&order_id).await.unwrap());
    }

    #[tokio::test]
    async fn custom_prefix_roundtrips() {
        let store = InMemoryOrderStore::with_prefix("order:pending:");
        let order_id = OrderId::new();
        store.put(sample_record(order_id), None).await.unwrap();

        assert!(store.get(&order_id).await.unwrap().is_some());
        assert_eq!(DEFAULT_KEY_PREFIX, "order:");
    }
}
