//! SurrealDB implementation of [`OrderRepository`].
//!
//! Orders live in the `sales_order` table with their items embedded, so
//! an order and its lines are written and deleted in one statement.
//! Status changes go through [`update_status`](OrderRepository::update_status),
//! which only writes when the stored status still matches the one the
//! caller read.

use chrono::{DateTime, Utc};
use larder_core::error::{LarderError, LarderResult};
use larder_core::models::order::{NewOrder, Order, OrderFilter, OrderItem, OrderStatus};
use larder_core::repository::{ListQuery, OrderRepository, PaginatedResult};
use larder_core::tenancy::{TenantId, TenantScoped, assert_owned_by};
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{CountRow, order_clause, parse_tenant, parse_uuid};
use crate::error::DbError;

const TABLE: &str = "sales_order";

const SORT_FIELDS: &[(&str, &str)] = &[
    ("orderNumber", "order_number"),
    ("status", "status"),
    ("totalPricePennies", "total_price_pennies"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

/// Storage shape of one embedded order line.
#[derive(Debug, Serialize, Deserialize)]
struct StoredItem {
    product_id: String,
    quantity: u32,
    unit_price_pennies: i64,
    total_price_pennies: i64,
}

impl From<&OrderItem> for StoredItem {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            quantity: item.quantity,
            unit_price_pennies: item.unit_price_pennies,
            total_price_pennies: item.total_price_pennies,
        }
    }
}

impl StoredItem {
    fn try_into_item(self) -> Result<OrderItem, DbError> {
        Ok(OrderItem {
            product_id: parse_uuid("product", &self.product_id)?,
            quantity: self.quantity,
            unit_price_pennies: self.unit_price_pennies,
            total_price_pennies: self.total_price_pennies,
        })
    }
}

fn encode_items(items: &[OrderItem]) -> Result<serde_json::Value, DbError> {
    let stored: Vec<StoredItem> = items.iter().map(StoredItem::from).collect();
    serde_json::to_value(stored).map_err(|e| DbError::corrupt("order items", e))
}

fn decode_items(value: serde_json::Value) -> Result<Vec<OrderItem>, DbError> {
    let stored: Vec<StoredItem> =
        serde_json::from_value(value).map_err(|e| DbError::corrupt("order items", e))?;
    stored.into_iter().map(StoredItem::try_into_item).collect()
}

fn parse_status(raw: &str) -> Result<OrderStatus, DbError> {
    raw.parse()
        .map_err(|e: LarderError| DbError::corrupt("order status", e))
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct OrderRow {
    tenant_id: String,
    shop_id: String,
    order_number: String,
    status: String,
    customer_name: Option<String>,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    customer_id: Option<String>,
    notes: Option<String>,
    items: serde_json::Value,
    total_price_pennies: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, id: Uuid) -> Result<Order, DbError> {
        Ok(Order {
            id,
            tenant_id: parse_tenant(&self.tenant_id)?,
            shop_id: parse_uuid("shop", &self.shop_id)?,
            order_number: self.order_number,
            status: parse_status(&self.status)?,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            customer_id: self
                .customer_id
                .as_deref()
                .map(|raw| parse_uuid("customer", raw))
                .transpose()?,
            notes: self.notes,
            items: decode_items(self.items)?,
            total_price_pennies: self.total_price_pennies,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrderRowWithId {
    record_id: String,
    tenant_id: String,
    shop_id: String,
    order_number: String,
    status: String,
    customer_name: Option<String>,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    customer_id: Option<String>,
    notes: Option<String>,
    items: serde_json::Value,
    total_price_pennies: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRowWithId {
    fn try_into_order(self) -> Result<Order, DbError> {
        let id = parse_uuid("order", &self.record_id)?;
        OrderRow {
            tenant_id: self.tenant_id,
            shop_id: self.shop_id,
            order_number: self.order_number,
            status: self.status,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            customer_id: self.customer_id,
            notes: self.notes,
            items: self.items,
            total_price_pennies: self.total_price_pennies,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_order(id)
    }
}

/// SurrealDB implementation of the Order repository.
#[derive(Clone)]
pub struct SurrealOrderRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrderRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    fn owned(tenant_id: TenantId, id: Uuid, rows: Vec<OrderRow>) -> LarderResult<Order> {
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("order", id))?;
        let order = row.into_order(id)?;
        assert_owned_by(tenant_id, &order)?;
        Ok(order)
    }
}

/// `WHERE` clause shared by the count and page queries of `list`.
fn filter_clause(filter: &OrderFilter) -> String {
    let mut conditions = vec!["tenant_id = $tenant_id"];
    if filter.status.is_some() {
        conditions.push("status = $status");
    }
    if filter.shop_id.is_some() {
        conditions.push("shop_id = $shop_id");
    }
    conditions.join(" AND ")
}

impl<C: Connection> OrderRepository for SurrealOrderRepository<C> {
    async fn create(&self, input: NewOrder) -> LarderResult<Order> {
        let id = Uuid::new_v4();
        let tenant_id = input.tenant_id;
        let items = encode_items(&input.items)?;

        let result = self
            .db
            .query(
                "CREATE type::record('sales_order', $id) SET \
                 tenant_id = $tenant_id, shop_id = $shop_id, \
                 order_number = $order_number, status = $status, \
                 customer_name = $customer_name, \
                 customer_email = $customer_email, \
                 customer_phone = $customer_phone, \
                 customer_id = $customer_id, notes = $notes, \
                 items = $items, total_price_pennies = $total_price_pennies",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("shop_id", input.shop_id.to_string()))
            .bind(("order_number", input.order_number))
            .bind(("status", input.status.as_str()))
            .bind(("customer_name", input.customer_name))
            .bind(("customer_email", input.customer_email))
            .bind(("customer_phone", input.customer_phone))
            .bind(("customer_id", input.customer_id.map(|c| c.to_string())))
            .bind(("notes", input.notes))
            .bind(("items", items))
            .bind(("total_price_pennies", input.total_price_pennies))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement("order", e))?;

        let rows: Vec<OrderRow> = result.take(0).map_err(DbError::from)?;
        Self::owned(tenant_id, id, rows)
    }

    async fn get_by_id(&self, tenant_id: TenantId, id: Uuid) -> LarderResult<Order> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('sales_order', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrderRow> = result.take(0).map_err(DbError::from)?;
        Self::owned(tenant_id, id, rows)
    }

    async fn list(
        &self,
        query: TenantScoped<ListQuery>,
        filter: OrderFilter,
    ) -> LarderResult<PaginatedResult<Order>> {
        let (tenant_id, query) = query.into_parts();
        let order_by = order_clause(query.sort.as_ref(), SORT_FIELDS)?;
        let pagination = query.pagination;
        pagination.validate()?;
        let conditions = filter_clause(&filter);
        let status = filter.status.map(|s| s.as_str().to_string());
        let shop_id = filter.shop_id.map(|s| s.to_string());

        let mut result = self
            .db
            .query(format!(
                "SELECT count() AS total FROM {TABLE} \
                 WHERE {conditions} GROUP ALL; \
                 SELECT meta::id(id) AS record_id, * FROM {TABLE} \
                 WHERE {conditions} \
                 {order_by} \
                 LIMIT $limit START $offset;"
            ))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("status", status))
            .bind(("shop_id", shop_id))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let count_rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let rows: Vec<OrderRowWithId> = result.take(1).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| {
                let order = row.try_into_order()?;
                assert_owned_by(tenant_id, &order)?;
                Ok(order)
            })
            .collect::<LarderResult<Vec<_>>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn update_status(
        &self,
        tenant_id: TenantId,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> LarderResult<Order> {
        let result = self
            .db
            .query(
                "UPDATE type::record('sales_order', $id) SET \
                 status = $next, updated_at = time::now() \
                 WHERE tenant_id = $tenant_id AND status = $expected",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("expected", expected.as_str()))
            .bind(("next", next.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement("order", e))?;

        let rows: Vec<OrderRow> = result.take(0).map_err(DbError::from)?;
        if !rows.is_empty() {
            debug!(order_id = %id, from = %expected, to = %next, "order status written");
            return Self::owned(tenant_id, id, rows);
        }

        // Nothing matched: either the order is gone (or foreign), or the
        // status moved under us.
        let current = self.get_by_id(tenant_id, id).await?;
        warn!(
            order_id = %id,
            expected = %expected,
            actual = %current.status,
            "order status changed concurrently"
        );
        Err(DbError::Conflict(format!(
            "order {id} is {}, expected {expected}",
            current.status
        ))
        .into())
    }

    async fn delete(&self, tenant_id: TenantId, id: Uuid) -> LarderResult<()> {
        let result = self
            .db
            .query(
                "DELETE type::record('sales_order', $id) \
                 WHERE tenant_id = $tenant_id RETURN BEFORE",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement("order", e))?;

        let rows: Vec<OrderRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("order", id).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_survive_storage_encoding() {
        let items = vec![OrderItem {
            product_id: Uuid::new_v4(),
            quantity: 3,
            unit_price_pennies: 250,
            total_price_pennies: 750,
        }];
        let value = encode_items(&items).unwrap();
        assert_eq!(value[0]["quantity"], 3);
        assert_eq!(decode_items(value).unwrap(), items);
    }

    #[test]
    fn filter_clause_adds_only_requested_conditions() {
        assert_eq!(
            filter_clause(&OrderFilter::default()),
            "tenant_id = $tenant_id"
        );
        let filter = OrderFilter {
            status: Some(OrderStatus::Ready),
            shop_id: Some(Uuid::new_v4()),
        };
        assert_eq!(
            filter_clause(&filter),
            "tenant_id = $tenant_id AND status = $status AND shop_id = $shop_id"
        );
    }

    #[test]
    fn unknown_stored_status_is_corrupt() {
        assert!(matches!(parse_status("SHIPPED"), Err(DbError::Corrupt(_))));
        assert_eq!(parse_status("READY").unwrap(), OrderStatus::Ready);
    }
}
