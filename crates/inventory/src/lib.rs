//! Product catalog and inventory validation engine.
//!
//! The catalog is the source of truth for availability, category,
//! activity and expiration of every product. The validation engine takes
//! an order's line items, checks each against the catalog under
//! category-specific rules, and produces a per-line and per-order
//! verdict. Approved orders decrement catalog stock for their physical
//! lines; rejected orders leave the catalog untouched.

pub mod catalog;
pub mod result;
pub mod validation;

pub use catalog::{InMemoryProductCatalog, Product, ProductCatalog};
pub use result::{InventoryCheckResult, IssueKind, ValidatedItem, ValidationIssue};
pub use validation::InventoryValidator;
