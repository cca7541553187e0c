//! Application configuration loaded from environment variables.

use saga::Topics;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `ORDER_PENDING_TTL_SECS` — pending order TTL (default: `600`)
/// - `ORDER_KEY_PREFIX` — order store key prefix (default: `"order:"`)
/// - `TOPIC_ORDER_CREATED` — creation event topic (default: `"order-created"`)
/// - `TOPIC_INVENTORY_CHECK_RESULT` — result event topic
///   (default: `"inventory-check-result"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub pending_ttl_secs: u64,
    pub order_key_prefix: String,
    pub topic_order_created: String,
    pub topic_inventory_check_result: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            pending_ttl_secs: std::env::var("ORDER_PENDING_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.pending_ttl_secs),
            order_key_prefix: std::env::var("ORDER_KEY_PREFIX").unwrap_or(defaults.order_key_prefix),
            topic_order_created: std::env::var("TOPIC_ORDER_CREATED")
                .unwrap_or(defaults.topic_order_created),
            topic_inventory_check_result: std::env::var("TOPIC_INVENTORY_CHECK_RESULT")
                .unwrap_or(defaults.topic_inventory_check_result),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the configured bus topics.
    pub fn topics(&self) -> Topics {
        Topics {
            order_created: self.topic_order_created.clone(),
            inventory_check_result: self.topic_inventory_check_result.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let topics = Topics::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            pending_ttl_secs: 600,
            order_key_prefix: "order:".to_string(),
            topic_order_created: topics.order_created,
            topic_inventory_check_result: topics.inventory_check_result,
        }
    }
}
