//! Shared types used by every service in the order lifecycle system.
//!
//! The intake, inventory and finalization services are deployed
//! independently and exchange data only through event payloads and the
//! order store, so the types they agree on live here: identifiers,
//! the product category taxonomy, and the order line item.

pub mod item;
pub mod types;

pub use item::{OrderItem, ProductCategory};
pub use types::{OrderId, ProductId};
