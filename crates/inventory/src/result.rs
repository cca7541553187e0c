//! Validation verdict types.
//!
//! These records are ephemeral: the engine builds them per check and
//! only the approved flag plus the issue summaries travel onward in the
//! result event.

use common::{OrderId, ProductCategory, ProductId};
use serde::{Deserialize, Serialize};

/// Why a line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// The requested product is not in the catalog.
    ProductNotFound,

    /// A standard product had less stock than requested.
    InsufficientQuantity,

    /// A perishable product was expired, or had insufficient stock; the
    /// two causes share this kind deliberately.
    ExpiredProduct,

    /// The product category could not be resolved.
    InvalidCategory,

    /// The product exists but is flagged inactive.
    ProductInactive,
}

impl IssueKind {
    /// Returns the wire name of the issue kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::ProductNotFound => "PRODUCT_NOT_FOUND",
            IssueKind::InsufficientQuantity => "INSUFFICIENT_QUANTITY",
            IssueKind::ExpiredProduct => "EXPIRED_PRODUCT",
            IssueKind::InvalidCategory => "INVALID_CATEGORY",
            IssueKind::ProductInactive => "PRODUCT_INACTIVE",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One rejected line of an order.
///
/// The reason string is a category-specific template kept for logging
/// and observability; machine decisions use `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// The product the issue refers to.
    pub product_id: ProductId,
    /// Human-readable reason.
    pub reason: String,
    /// The issue classification.
    #[serde(rename = "type")]
    pub kind: IssueKind,
}

/// The per-line outcome of a validation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedItem {
    /// The requested product.
    pub product_id: ProductId,
    /// Quantity the order asked for.
    pub requested_quantity: u32,
    /// Stock level observed at check time (0 for unknown or inactive
    /// products).
    pub available_quantity: u32,
    /// Category resolved from the catalog; `None` when the product was
    /// not found.
    pub category: Option<ProductCategory>,
    /// Whether the line can be fulfilled.
    pub available: bool,
}

/// The overall verdict for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCheckResult {
    /// The checked order.
    pub order_id: OrderId,
    /// True iff every line is available.
    pub approved: bool,
    /// One issue per unavailable line; empty iff approved.
    pub issues: Vec<ValidationIssue>,
    /// The per-line outcomes, in order of the request lines.
    pub validated_items: Vec<ValidatedItem>,
}
