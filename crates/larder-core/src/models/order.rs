//! Order domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MAX_LONG_TEXT_LEN, MAX_TEXT_LEN, check_email, check_len};
use crate::error::{LarderError, LarderResult};
use crate::tenancy::{TenantId, TenantOwned};

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Being assembled, not yet submitted.
    Draft,
    /// Submitted, awaiting confirmation.
    Pending,
    Confirmed,
    Preparing,
    /// Ready for pickup or delivery.
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Draft,
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Draft => "DRAFT",
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = LarderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| LarderError::validation(format!("unknown order status: {s}")))
    }
}

/// A named command that moves an order between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderAction {
    Submit,
    Confirm,
    Cancel,
    StartPreparing,
    MarkReady,
    Complete,
}

impl OrderAction {
    pub const ALL: [OrderAction; 6] = [
        OrderAction::Submit,
        OrderAction::Confirm,
        OrderAction::Cancel,
        OrderAction::StartPreparing,
        OrderAction::MarkReady,
        OrderAction::Complete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderAction::Submit => "submit",
            OrderAction::Confirm => "confirm",
            OrderAction::Cancel => "cancel",
            OrderAction::StartPreparing => "start-preparing",
            OrderAction::MarkReady => "mark-ready",
            OrderAction::Complete => "complete",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderAction {
    type Err = LarderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| LarderError::validation(format!("unknown order action: {s}")))
    }
}

/// A priced line within an order. Fixed once the order is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub quantity: u32,
    /// Product price captured at order time.
    pub unit_price_pennies: i64,
    pub total_price_pennies: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub shop_id: Uuid,
    /// Human-readable reference, e.g. `ORD-1A2B3C4D-20260118-9F8E7D6C`.
    pub order_number: String,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_id: Option<Uuid>,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_price_pennies: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Order {
    const ENTITY: &'static str = "order";

    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// A requested line: which product, how many.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Caller input for creating an order. The tenant comes from the
/// request context, never from this payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub shop_id: Uuid,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_id: Option<Uuid>,
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

impl CreateOrder {
    /// Field-level checks. Limits on line count and quantity depend on
    /// service configuration and are applied by the order service.
    pub fn validate(&self) -> LarderResult<()> {
        if self.items.is_empty() {
            return Err(LarderError::validation("an order needs at least one item"));
        }
        if let Some(name) = &self.customer_name {
            check_len("customerName", name, MAX_TEXT_LEN)?;
        }
        if let Some(email) = &self.customer_email {
            check_email("customerEmail", email)?;
        }
        if let Some(phone) = &self.customer_phone {
            check_len("customerPhone", phone, 50)?;
        }
        if let Some(notes) = &self.notes {
            check_len("notes", notes, MAX_LONG_TEXT_LEN)?;
        }
        Ok(())
    }
}

/// A fully validated and priced order, ready to persist.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub tenant_id: TenantId,
    pub shop_id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_id: Option<Uuid>,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_price_pennies: i64,
}

/// Optional narrowing for order listings.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub shop_id: Option<Uuid>,
}
