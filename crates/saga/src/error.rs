//! Coordinator error types.

use thiserror::Error;

/// Errors surfaced synchronously at the intake boundary.
///
/// Malformed input is rejected before any state is created; everything
/// downstream of a stored order is logged rather than surfaced.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The customer name was empty or blank.
    #[error("Customer name must not be blank")]
    BlankCustomerName,

    /// The order carried no line items.
    #[error("Order must contain at least one item")]
    NoItems,

    /// A line item requested a non-positive quantity.
    #[error("Item '{product_id}' has non-positive quantity")]
    NonPositiveQuantity { product_id: String },

    /// The order store rejected the initial write.
    #[error("Order store error: {0}")]
    Store(#[from] order_store::StoreError),
}
