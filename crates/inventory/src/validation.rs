//! The inventory validation engine.

use chrono::Utc;
use common::{OrderId, OrderItem, ProductCategory};

use crate::catalog::{Product, ProductCatalog};
use crate::result::{InventoryCheckResult, IssueKind, ValidatedItem, ValidationIssue};

/// Decides per-line and per-order availability against the catalog.
///
/// The engine is a pure decision function over catalog state; the stock
/// decrement for approved orders is applied separately by [`commit`]
/// so it can be ordered before the result event is published.
///
/// [`commit`]: InventoryValidator::commit
pub struct InventoryValidator<C> {
    catalog: C,
}

impl<C: ProductCatalog> InventoryValidator<C> {
    /// Creates a validator over the given catalog.
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Checks every line of the order and aggregates the verdict.
    ///
    /// All lines are evaluated even after the first failure so the
    /// issue list covers every unavailable line.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub async fn validate(&self, order_id: OrderId, items: &[OrderItem]) -> InventoryCheckResult {
        tracing::info!(%order_id, items = items.len(), "validating order");
        let started = std::time::Instant::now();

        let mut issues = Vec::new();
        let mut validated_items = Vec::with_capacity(items.len());
        let mut approved = true;

        for item in items {
            let validated = self.validate_item(item).await;
            if !validated.available {
                approved = false;
                issues.push(ValidationIssue {
                    product_id: validated.product_id.clone(),
                    reason: issue_reason(&validated),
                    kind: issue_kind(&validated),
                });
            }
            validated_items.push(validated);
        }

        if approved {
            tracing::info!(%order_id, "order approved, all items available");
            metrics::counter!("inventory_orders_approved_total").increment(1);
        } else {
            tracing::warn!(%order_id, issues = issues.len(), "order rejected");
            for issue in &issues {
                tracing::warn!(product_id = %issue.product_id, kind = %issue.kind, reason = %issue.reason, "issue");
            }
            metrics::counter!("inventory_orders_rejected_total").increment(1);
        }
        metrics::histogram!("inventory_validation_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        InventoryCheckResult {
            order_id,
            approved,
            issues,
            validated_items,
        }
    }

    /// Applies the stock decrement for an approved order.
    ///
    /// Every available non-digital line decrements the catalog by the
    /// requested amount, atomically per product key. Digital lines never
    /// decrement. A rejected result is a logged no-op so a rejected
    /// order can never touch the catalog, including lines that passed
    /// individually.
    pub async fn commit(&self, result: &InventoryCheckResult) {
        if !result.approved {
            tracing::warn!(order_id = %result.order_id, "inventory update attempted for rejected order");
            return;
        }

        tracing::info!(order_id = %result.order_id, "updating inventory for approved order");
        for item in &result.validated_items {
            if item.available && item.category != Some(ProductCategory::Digital) {
                self.catalog
                    .decrement_quantity(&item.product_id, item.requested_quantity)
                    .await;
            }
        }
    }

    async fn validate_item(&self, item: &OrderItem) -> ValidatedItem {
        match self.catalog.find(&item.product_id).await {
            Some(product) => check_availability(&product, item),
            None => ValidatedItem {
                product_id: item.product_id.clone(),
                requested_quantity: item.quantity,
                available_quantity: 0,
                category: None,
                available: false,
            },
        }
    }
}

fn check_availability(product: &Product, item: &OrderItem) -> ValidatedItem {
    if !product.active {
        return ValidatedItem {
            product_id: item.product_id.clone(),
            requested_quantity: item.quantity,
            available_quantity: 0,
            category: Some(product.category),
            available: false,
        };
    }

    let available = match product.category {
        ProductCategory::Standard => product.available_quantity >= item.quantity,
        ProductCategory::Perishable => {
            let not_expired = product
                .expiration_date
                .is_some_and(|date| date > Utc::now().date_naive());
            not_expired && product.available_quantity >= item.quantity
        }
        // Digital products are always available.
        ProductCategory::Digital => true,
    };

    ValidatedItem {
        product_id: item.product_id.clone(),
        requested_quantity: item.quantity,
        available_quantity: product.available_quantity,
        category: Some(product.category),
        available,
    }
}

fn issue_reason(item: &ValidatedItem) -> String {
    match item.category {
        None => "Product not found in catalog".to_string(),
        Some(ProductCategory::Standard) => format!(
            "Insufficient quantity. Requested: {}, Available: {}",
            item.requested_quantity, item.available_quantity
        ),
        Some(ProductCategory::Perishable) => "Product expired or insufficient quantity".to_string(),
        Some(ProductCategory::Digital) => "Digital product unavailable (should not happen)".to_string(),
    }
}

fn issue_kind(item: &ValidatedItem) -> IssueKind {
    match item.category {
        None => IssueKind::ProductNotFound,
        Some(ProductCategory::Standard) => IssueKind::InsufficientQuantity,
        // The expired kind also covers insufficient perishable stock; the
        // result does not distinguish the two causes.
        Some(ProductCategory::Perishable) => IssueKind::ExpiredProduct,
        // A digital line only fails when the product is inactive.
        Some(ProductCategory::Digital) => IssueKind::ProductInactive,
    }
}
