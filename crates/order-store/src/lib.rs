//! Key-value store for order records.
//!
//! Orders are written once at intake with status `PENDING` and a TTL,
//! and overwritten exactly once by finalization with a terminal status.
//! The TTL bounds how long an order can sit unresolved when the result
//! event never arrives; an expired record simply vanishes.

pub mod error;
pub mod memory;
pub mod record;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryOrderStore;
pub use record::{OrderRecord, OrderStatus};
pub use store::OrderStore;
