//! Ordered, partitioned, at-least-once publish/subscribe channel.
//!
//! Messages are keyed: deliveries with the same key reach a consumer
//! group in publish order, while deliveries with different keys carry no
//! relative ordering guarantee. Delivery is at-least-once, so handlers
//! must tolerate duplicates.
//!
//! The [`EventBus`] trait is the seam the lifecycle services depend on;
//! [`InMemoryEventBus`] is the in-process implementation used by the
//! binary and the test suites.

pub mod bus;
pub mod error;
pub mod memory;

pub use bus::{Delivery, EventBus, EventHandler, PublishAck};
pub use error::BusError;
pub use memory::InMemoryEventBus;
