//! Order lifecycle coordinator.
//!
//! Drives an order from `PENDING` to a terminal state through three
//! roles connected only by the event bus and the order store:
//!
//! 1. **Intake** stores the order as `PENDING` with a TTL and emits
//!    `ORDER_CREATED`.
//! 2. **Validation** consumes creation events, runs the inventory
//!    engine, decrements stock for approved orders and emits
//!    `INVENTORY_CHECK_RESULT`.
//! 3. **Finalization** consumes result events and transitions the
//!    stored order to `COMPLETED` or `REJECTED`.
//!
//! There is no compensation path: a publish failure after local state
//! has changed leaves the order stuck in `PENDING` until its TTL
//! expires. That is an accepted limitation of the design, not handled
//! here.

pub mod error;
pub mod events;
pub mod finalization;
pub mod intake;
pub mod topics;
pub mod validation_worker;

pub use error::IntakeError;
pub use events::{
    INVENTORY_CHECK_RESULT_EVENT_TYPE, InventoryCheckResultEvent, MissingItem,
    ORDER_CREATED_EVENT_TYPE, OrderCreatedEvent,
};
pub use finalization::FinalizationWorker;
pub use intake::{CreateOrderRequest, IntakeService};
pub use topics::{FINALIZATION_CONSUMER_GROUP, INVENTORY_CONSUMER_GROUP, Topics};
pub use validation_worker::ValidationWorker;
