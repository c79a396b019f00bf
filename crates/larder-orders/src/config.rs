//! Order service configuration.

use std::time::Duration;

use larder_core::error::{LarderError, LarderResult};
use larder_core::models::order::OrderStatus;
use serde::Deserialize;

/// Tunables for order creation and store access.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// Status new orders start in. Either `DRAFT` or `PENDING`.
    pub initial_status: OrderStatus,
    /// Maximum number of lines per order.
    pub max_items: usize,
    /// Maximum quantity on a single line.
    pub max_item_quantity: u32,
    /// Upper bound on a single store call, in milliseconds.
    pub store_timeout_ms: u64,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            initial_status: OrderStatus::Draft,
            max_items: 100,
            max_item_quantity: 10_000,
            store_timeout_ms: 5_000,
        }
    }
}

impl OrderConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn validate(&self) -> LarderResult<()> {
        if !matches!(
            self.initial_status,
            OrderStatus::Draft | OrderStatus::Pending
        ) {
            return Err(LarderError::validation(format!(
                "orders.initial_status must be DRAFT or PENDING, got {}",
                self.initial_status
            )));
        }
        if self.max_items == 0 {
            return Err(LarderError::validation("orders.max_items must be positive"));
        }
        if self.max_item_quantity == 0 {
            return Err(LarderError::validation(
                "orders.max_item_quantity must be positive",
            ));
        }
        if self.store_timeout_ms == 0 {
            return Err(LarderError::validation(
                "orders.store_timeout_ms must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = OrderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_status, OrderStatus::Draft);
        assert_eq!(config.store_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn initial_status_must_be_an_entry_state() {
        let config = OrderConfig {
            initial_status: OrderStatus::Confirmed,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = OrderConfig {
            initial_status: OrderStatus::Pending,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_limits_are_rejected() {
        for config in [
            OrderConfig {
                max_items: 0,
                ..Default::default()
            },
            OrderConfig {
                max_item_quantity: 0,
                ..Default::default()
            },
            OrderConfig {
                store_timeout_ms: 0,
                ..Default::default()
            },
        ] {
            assert!(config.validate().is_err());
        }
    }
}
