//! Order service: creation, reads and lifecycle transitions.

use chrono::Utc;
use larder_core::error::{LarderError, LarderResult};
use larder_core::lifecycle::apply_transition;
use larder_core::models::order::{
    CreateOrder, NewOrder, Order, OrderAction, OrderFilter, OrderItem,
};
use larder_core::repository::{
    CustomerRepository, ListQuery, OrderRepository, PaginatedResult, ProductRepository,
    ShopRepository,
};
use larder_core::tenancy::{TenantContext, assert_owned, scope_query};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::OrderConfig;
use crate::number;
use crate::store::bounded;

/// A dangling shop, product or customer id on a new order is a
/// `Validation` failure, not `NotFound`.
fn reference_error(err: LarderError, what: &str, id: Uuid) -> LarderError {
    match err {
        LarderError::NotFound { .. } => LarderError::validation(format!("{what} not found: {id}")),
        other => other,
    }
}

/// Order service, generic over its repositories.
pub struct OrderService<O, S, P, C>
where
    O: OrderRepository,
    S: ShopRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    orders: O,
    shops: S,
    products: P,
    customers: C,
    config: OrderConfig,
}

impl<O, S, P, C> OrderService<O, S, P, C>
where
    O: OrderRepository,
    S: ShopRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    pub fn new(orders: O, shops: S, products: P, customers: C, config: OrderConfig) -> Self {
        Self {
            orders,
            shops,
            products,
            customers,
            config,
        }
    }

    pub fn config(&self) -> &OrderConfig {
        &self.config
    }

    /// Validate, price and persist a new order.
    ///
    /// Each line is priced from the product's current price. The
    /// referenced shop, products and customer must belong to the
    /// caller's tenant.
    pub async fn create_order(&self, ctx: &TenantContext, input: CreateOrder) -> LarderResult<Order> {
        input.validate()?;
        self.check_limits(&input)?;

        let tenant_id = ctx.tenant_id();
        let timeout = self.config.store_timeout();

        let shop = bounded(timeout, "load shop", self.shops.get_by_id(tenant_id, input.shop_id))
            .await
            .map_err(|e| reference_error(e, "shop", input.shop_id))?;
        assert_owned(ctx, &shop).map_err(|e| reference_error(e, "shop", input.shop_id))?;

        if let Some(customer_id) = input.customer_id {
            let customer = bounded(
                timeout,
                "load customer",
                self.customers.get_by_id(tenant_id, customer_id),
            )
            .await
            .map_err(|e| reference_error(e, "customer", customer_id))?;
            assert_owned(ctx, &customer)
                .map_err(|e| reference_error(e, "customer", customer_id))?;
        }

        let mut items = Vec::with_capacity(input.items.len());
        let mut total: i64 = 0;
        for line in &input.items {
            let product = bounded(
                timeout,
                "load product",
                self.products.get_by_id(tenant_id, line.product_id),
            )
            .await
            .map_err(|e| reference_error(e, "product", line.product_id))?;
            assert_owned(ctx, &product)
                .map_err(|e| reference_error(e, "product", line.product_id))?;

            let unit_price = product.price_pennies.ok_or_else(|| {
                LarderError::validation(format!("product {} has no price", product.sku))
            })?;
            let line_total = unit_price
                .checked_mul(i64::from(line.quantity))
                .ok_or_else(|| LarderError::validation("order total overflows"))?;
            total = total
                .checked_add(line_total)
                .ok_or_else(|| LarderError::validation("order total overflows"))?;

            items.push(OrderItem {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price_pennies: unit_price,
                total_price_pennies: line_total,
            });
        }

        let new_order = NewOrder {
            tenant_id,
            shop_id: shop.id,
            order_number: number::generate(tenant_id, Utc::now()),
            status: self.config.initial_status,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            customer_phone: input.customer_phone,
            customer_id: input.customer_id,
            notes: input.notes,
            items,
            total_price_pennies: total,
        };

        let order = bounded(timeout, "create order", self.orders.create(new_order)).await?;
        info!(
            tenant_id = %tenant_id,
            order_id = %order.id,
            order_number = %order.order_number,
            status = %order.status,
            total_price_pennies = order.total_price_pennies,
            "order created"
        );
        Ok(order)
    }

    pub async fn get_order(&self, ctx: &TenantContext, id: Uuid) -> LarderResult<Order> {
        let order = bounded(
            self.config.store_timeout(),
            "load order",
            self.orders.get_by_id(ctx.tenant_id(), id),
        )
        .await?;
        assert_owned(ctx, &order)?;
        Ok(order)
    }

    pub async fn list_orders(
        &self,
        ctx: &TenantContext,
        query: ListQuery,
        filter: OrderFilter,
    ) -> LarderResult<PaginatedResult<Order>> {
        bounded(
            self.config.store_timeout(),
            "list orders",
            self.orders.list(scope_query(ctx, query), filter),
        )
        .await
    }

    pub async fn delete_order(&self, ctx: &TenantContext, id: Uuid) -> LarderResult<()> {
        bounded(
            self.config.store_timeout(),
            "delete order",
            self.orders.delete(ctx.tenant_id(), id),
        )
        .await?;
        info!(tenant_id = %ctx.tenant_id(), order_id = %id, "order deleted");
        Ok(())
    }

    /// Apply a lifecycle action to an order.
    ///
    /// The write only lands if the status is unchanged since it was
    /// read; otherwise the caller gets `Conflict` and may re-fetch.
    pub async fn transition(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        action: OrderAction,
    ) -> LarderResult<Order> {
        let current = self.get_order(ctx, id).await?;

        let next = apply_transition(current.status, action).inspect_err(|e| {
            warn!(
                tenant_id = %ctx.tenant_id(),
                order_id = %id,
                status = %current.status,
                action = %action,
                error = %e,
                "order transition rejected"
            );
        })?;

        let updated = bounded(
            self.config.store_timeout(),
            "update order status",
            self.orders
                .update_status(ctx.tenant_id(), id, current.status, next),
        )
        .await
        .inspect_err(|e| {
            if matches!(e, LarderError::Conflict { .. }) {
                warn!(order_id = %id, action = %action, "order transition lost a race");
            }
        })?;

        info!(
            tenant_id = %ctx.tenant_id(),
            order_id = %id,
            from = %current.status,
            to = %updated.status,
            action = %action,
            subject = ctx.subject().unwrap_or("-"),
            "order transitioned"
        );
        Ok(updated)
    }

    fn check_limits(&self, input: &CreateOrder) -> LarderResult<()> {
        if input.items.len() > self.config.max_items {
            return Err(LarderError::validation(format!(
                "an order may have at most {} items",
                self.config.max_items
            )));
        }
        for line in &input.items {
            if line.quantity == 0 || line.quantity > self.config.max_item_quantity {
                return Err(LarderError::validation(format!(
                    "quantity must be between 1 and {}",
                    self.config.max_item_quantity
                )));
            }
        }
        Ok(())
    }
}
