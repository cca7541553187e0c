//! Topic and consumer group names.

/// Consumer group of the validation worker.
pub const INVENTORY_CONSUMER_GROUP: &str = "inventory-service";

/// Consumer group of the finalization worker.
pub const FINALIZATION_CONSUMER_GROUP: &str = "notification-service";

/// The bus topics the lifecycle events travel on.
#[derive(Debug, Clone)]
pub struct Topics {
    /// Topic for `ORDER_CREATED` events.
    pub order_created: String,
    /// Topic for `INVENTORY_CHECK_RESULT` events.
    pub inventory_check_result: String,
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            order_created: "order-created".to_string(),
            inventory_check_result: "inventory-check-result".to_string(),
        }
    }
}
