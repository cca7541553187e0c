//! Product catalog trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use common::{ProductCategory, ProductId};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A product record in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier, the catalog key.
    pub product_id: ProductId,
    /// Display name.
    pub name: String,
    /// Category driving the availability rules.
    pub category: ProductCategory,
    /// Units in stock. Unsigned, so it can never go negative.
    pub available_quantity: u32,
    /// Expiration date; meaningful only for perishable products.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    /// Inactive products are unavailable regardless of category.
    pub active: bool,
}

/// Trait for product catalog implementations.
///
/// The catalog owns all writes to product state. Quantity updates are
/// atomic per product key; no cross-key transactions exist because each
/// order validation mutates disjoint product keys independently.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Looks up a product by ID.
    async fn find(&self, product_id: &ProductId) -> Option<Product>;

    /// Returns all products.
    async fn list(&self) -> Vec<Product>;

    /// Sets the available quantity of a product.
    ///
    /// A logged-warning no-op when the product is unknown.
    async fn set_quantity(&self, product_id: &ProductId, quantity: u32);

    /// Atomically decrements the available quantity of a product.
    ///
    /// Saturates at zero with a warning instead of underflowing; a
    /// logged-warning no-op when the product is unknown.
    async fn decrement_quantity(&self, product_id: &ProductId, amount: u32);

    /// Inserts or replaces a product.
    async fn upsert(&self, product: Product);

    /// Removes a product. Returns true if it existed.
    async fn remove(&self, product_id: &ProductId) -> bool;
}

/// In-memory product catalog.
///
/// All mutations happen under one write lock, which makes every
/// per-key update atomic and rules out lost updates between concurrent
/// orders referencing the same product.
#[derive(Clone, Default)]
pub struct InMemoryProductCatalog {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded with the demo product set: two standard
    /// products, three perishables (one already expired) and two digital
    /// products.
    pub fn with_sample_data() -> Self {
        let today = Utc::now().date_naive();
        let products = [
            Product {
                product_id: ProductId::new("P1001"),
                name: "Standard Product 1".to_string(),
                category: ProductCategory::Standard,
                available_quantity: 50,
                expiration_date: None,
                active: true,
            },
            Product {
                product_id: ProductId::new("P1002"),
                name: "Standard Product 2".to_string(),
                category: ProductCategory::Standard,
                available_quantity: 10,
                expiration_date: None,
                active: true,
            },
            Product {
                product_id: ProductId::new("P2001"),
                name: "Fresh Milk".to_string(),
                category: ProductCategory::Perishable,
                available_quantity: 20,
                expiration_date: Some(today + Days::new(7)),
                active: true,
            },
            Product {
                product_id: ProductId::new("P2002"),
                name: "Expired Yogurt".to_string(),
                category: ProductCategory::Perishable,
                available_quantity: 5,
                expiration_date: Some(today - Days::new(1)),
                active: true,
            },
            Product {
                product_id: ProductId::new("P2003"),
                name: "Fresh Bread".to_string(),
                category: ProductCategory::Perishable,
                available_quantity: 15,
                expiration_date: Some(today + Days::new(3)),
                active: true,
            },
            Product {
                product_id: ProductId::new("P3001"),
                name: "Digital Book".to_string(),
                category: ProductCategory::Digital,
                available_quantity: 1000,
                expiration_date: None,
                active: true,
            },
            Product {
                product_id: ProductId::new("P3002"),
                name: "Software License".to_string(),
                category: ProductCategory::Digital,
                available_quantity: 500,
                expiration_date: None,
                active: true,
            },
        ];

        let map: HashMap<ProductId, Product> = products
            .into_iter()
            .map(|p| (p.product_id.clone(), p))
            .collect();
        tracing::info!(products = map.len(), "initialized sample product catalog");

        Self {
            products: Arc::new(RwLock::new(map)),
        }
    }

    /// Returns the number of products in the catalog.
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    /// Returns true if the catalog is empty.
    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn find(&self, product_id: &ProductId) -> Option<Product> {
        self.products.read().await.get(product_id).cloned()
    }

    async fn list(&self) -> Vec<Product> {
        self.products.read().await.values().cloned().collect()
    }

    async fn set_quantity(&self, product_id: &ProductId, quantity: u32) {
        let mut products = self.products.write().await;
        match products.get_mut(product_id) {
            Some(product) => {
                product.available_quantity = quantity;
                tracing::info!(%product_id, quantity, "updated product quantity");
            }
            None => {
                tracing::warn!(%product_id, "quantity update for unknown product ignored");
            }
        }
    }

    async fn decrement_quantity(&self, product_id: &ProductId, amount: u32) {
        let mut products = self.products.write().await;
        match products.get_mut(product_id) {
            Some(product) => {
                if amount > product.available_quantity {
                    tracing::warn!(
                        %product_id,
                        available = product.available_quantity,
                        amount,
                        "decrement exceeds stock, clamping to zero"
                    );
                }
                let before = product.available_quantity;
                product.available_quantity = before.saturating_sub(amount);
                tracing::info!(
                    %product_id,
                    from = before,
                    to = product.available_quantity,
                    "decremented product quantity"
                );
            }
            None => {
                tracing::warn!(%product_id, "decrement for unknown product ignored");
            }
        }
    }

    async fn upsert(&self, product: Product) {
        let product_id = product.product_id.clone();
        self.products
            .write()
            .await
            .insert(product_id.clone(), product);
        tracing::info!(%product_id, "upserted product");
    }

    async fn remove(&self, product_id: &ProductId) -> bool {
        let removed = self.products.write().await.remove(product_id).is_some();
        if removed {
            tracing::info!(%product_id, "removed product");
        } else {
            tracing::warn!(%product_id, "removal of unknown product ignored");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(quantity: u32) -> Product {
        Product {
            product_id: ProductId::new("P1001"),
            name: "Widget".to_string(),
            category: ProductCategory::Standard,
            available_quantity: quantity,
            expiration_date: None,
            active: true,
        }
    }

    #[tokio::test]
    async fn upsert_and_find() {
        let catalog = InMemoryProductCatalog::new();
        catalog.upsert(widget(10)).await;

        let found = catalog.find(&ProductId::new("P1001")).await.unwrap();
        assert_eq!(found.available_quantity, 10);
        assert!(catalog.find(&ProductId::new("missing")).await.is_none());
    }

    #[tokio::test]
    async fn set_quantity_updates_existing_product() {
        let catalog = InMemoryProductCatalog::new();
        catalog.upsert(widget(10)).await;

        catalog.set_quantity(&ProductId::new("P1001"), 3).await;
        let found = catalog.find(&ProductId::new("P1001")).await.unwrap();
        assert_eq!(found.available_quantity, 3);
    }

    #[tokio::test]
    async fn set_quantity_for_unknown_product_is_a_noop() {
        let catalog = InMemoryProductCatalog::new();
        catalog.set_quantity(&ProductId::new("ghost"), 3).await;
        assert!(catalog.is_empty().await);
    }

    #[tokio::test]
    async fn decrement_subtracts_and_saturates() {
        let catalog = InMemoryProductCatalog::new();
        catalog.upsert(widget(10)).await;
        let id = ProductId::new("P1001");

        catalog.decrement_quantity(&id, 4).await;
        assert_eq!(catalog.find(&id).await.unwrap().available_quantity, 6);

        catalog.decrement_quantity(&id, 100).await;
        assert_eq!(catalog.find(&id).await.unwrap().available_quantity, 0);
    }

    #[tokio::test]
    async fn remove_reports_whether_the_product_existed() {
        let catalog = InMemoryProductCatalog::new();
        catalog.upsert(widget(10)).await;

        assert!(catalog.remove(&ProductId::new("P1001")).await);
        assert!(!catalog.remove(&ProductId::new("P1001")).await);
    }

    #[tokio::test]
    async fn sample_data_contains_the_demo_products() {
        let catalog = InMemoryProductCatalog::with_sample_data();
        assert_eq!(catalog.len().await, 7);

        let milk = catalog.find(&ProductId::new("P2001")).await.unwrap();
        assert_eq!(milk.category, ProductCategory::Perishable);
        assert!(milk.expiration_date.unwrap() > Utc::now().date_naive());

        let yogurt = catalog.find(&ProductId::new("P2002")).await.unwrap();
        assert!(yogurt.expiration_date.unwrap() < Utc::now().date_naive());
    }

    #[tokio::test]
    async fn concurrent_decrements_on_one_product_lose_no_updates() {
        let catalog = InMemoryProductCatalog::new();
        catalog.upsert(widget(100)).await;
        let id = ProductId::new("P1001");

        let mut handles = Vec::new();
        for _ in 0..10 {
            let catalog = catalog.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..10 {
                    catalog.decrement_quantity(&id, 1).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(catalog.find(&id).await.unwrap().available_quantity, 0);
    }

    #[tokio::test]
    async fn product_serializes_camel_case_and_omits_missing_expiration() {
        let json = serde_json::to_value(widget(10)).unwrap();
        assert_eq!(json["productId"], "P1001");
        assert_eq!(json["availableQuantity"], 10);
        assert!(json.get("expirationDate").is_none());
    }
}
