//! Validated, tenant-scoped access to shops, products and customers.

use std::time::Duration;

use larder_core::error::LarderResult;
use larder_core::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use larder_core::models::product::{CreateProduct, Product, UpdateProduct};
use larder_core::models::shop::{CreateShop, Shop, UpdateShop};
use larder_core::repository::{
    CustomerRepository, ListQuery, PaginatedResult, ProductRepository, ShopRepository,
};
use larder_core::tenancy::{TenantContext, scope_query};
use tracing::info;
use uuid::Uuid;

use crate::store::bounded;

pub struct CatalogService<S, P, C>
where
    S: ShopRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    shops: S,
    products: P,
    customers: C,
    timeout: Duration,
}

impl<S, P, C> CatalogService<S, P, C>
where
    S: ShopRepository,
    P: ProductRepository,
    C: CustomerRepository,
{
    pub fn new(shops: S, products: P, customers: C, timeout: Duration) -> Self {
        Self {
            shops,
            products,
            customers,
            timeout,
        }
    }

    // -- shops --------------------------------------------------------------

    pub async fn create_shop(&self, ctx: &TenantContext, input: CreateShop) -> LarderResult<Shop> {
        input.validate()?;
        let shop = bounded(
            self.timeout,
            "create shop",
            self.shops.create(ctx.tenant_id(), input),
        )
        .await?;
        info!(tenant_id = %ctx.tenant_id(), shop_id = %shop.id, "shop created");
        Ok(shop)
    }

    pub async fn get_shop(&self, ctx: &TenantContext, id: Uuid) -> LarderResult<Shop> {
        bounded(self.timeout, "load shop", self.shops.get_by_id(ctx.tenant_id(), id)).await
    }

    pub async fn update_shop(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        input: UpdateShop,
    ) -> LarderResult<Shop> {
        input.validate()?;
        bounded(
            self.timeout,
            "update shop",
            self.shops.update(ctx.tenant_id(), id, input),
        )
        .await
    }

    pub async fn delete_shop(&self, ctx: &TenantContext, id: Uuid) -> LarderResult<()> {
        bounded(self.timeout, "delete shop", self.shops.delete(ctx.tenant_id(), id)).await?;
        info!(tenant_id = %ctx.tenant_id(), shop_id = %id, "shop deleted");
        Ok(())
    }

    pub async fn list_shops(
        &self,
        ctx: &TenantContext,
        query: ListQuery,
    ) -> LarderResult<PaginatedResult<Shop>> {
        bounded(self.timeout, "list shops", self.shops.list(scope_query(ctx, query))).await
    }

    // -- products -----------------------------------------------------------

    pub async fn create_product(
        &self,
        ctx: &TenantContext,
        input: CreateProduct,
    ) -> LarderResult<Product> {
        input.validate()?;
        let product = bounded(
            self.timeout,
            "create product",
            self.products.create(ctx.tenant_id(), input),
        )
        .await?;
        info!(
            tenant_id = %ctx.tenant_id(),
            product_id = %product.id,
            sku = %product.sku,
            "product created"
        );
        Ok(product)
    }

    pub async fn get_product(&self, ctx: &TenantContext, id: Uuid) -> LarderResult<Product> {
        bounded(
            self.timeout,
            "load product",
            self.products.get_by_id(ctx.tenant_id(), id),
        )
        .await
    }

    pub async fn update_product(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        input: UpdateProduct,
    ) -> LarderResult<Product> {
        input.validate()?;
        bounded(
            self.timeout,
            "update product",
            self.products.update(ctx.tenant_id(), id, input),
        )
        .await
    }

    pub async fn delete_product(&self, ctx: &TenantContext, id: Uuid) -> LarderResult<()> {
        bounded(
            self.timeout,
            "delete product",
            self.products.delete(ctx.tenant_id(), id),
        )
        .await?;
        info!(tenant_id = %ctx.tenant_id(), product_id = %id, "product deleted");
        Ok(())
    }

    pub async fn list_products(
        &self,
        ctx: &TenantContext,
        query: ListQuery,
    ) -> LarderResult<PaginatedResult<Product>> {
        bounded(
            self.timeout,
            "list products",
            self.products.list(scope_query(ctx, query)),
        )
        .await
    }

    // -- customers ----------------------------------------------------------

    pub async fn create_customer(
        &self,
        ctx: &TenantContext,
        input: CreateCustomer,
    ) -> LarderResult<Customer> {
        input.validate()?;
        let customer = bounded(
            self.timeout,
            "create customer",
            self.customers.create(ctx.tenant_id(), input),
        )
        .await?;
        info!(tenant_id = %ctx.tenant_id(), customer_id = %customer.id, "customer created");
        Ok(customer)
    }

    pub async fn get_customer(&self, ctx: &TenantContext, id: Uuid) -> LarderResult<Customer> {
        bounded(
            self.timeout,
            "load customer",
            self.customers.get_by_id(ctx.tenant_id(), id),
        )
        .await
    }

    pub async fn update_customer(
        &self,
        ctx: &TenantContext,
        id: Uuid,
        input: UpdateCustomer,
    ) -> LarderResult<Customer> {
        input.validate()?;
        bounded(
            self.timeout,
            "update customer",
            self.customers.update(ctx.tenant_id(), id, input),
        )
        .await
    }

    pub async fn delete_customer(&self, ctx: &TenantContext, id: Uuid) -> LarderResult<()> {
        bounded(
            self.timeout,
            "delete customer",
            self.customers.delete(ctx.tenant_id(), id),
        )
        .await?;
        info!(tenant_id = %ctx.tenant_id(), customer_id = %id, "customer deleted");
        Ok(())
    }

    pub async fn list_customers(
        &self,
        ctx: &TenantContext,
        query: ListQuery,
    ) -> LarderResult<PaginatedResult<Customer>> {
        bounded(
            self.timeout,
            "list customers",
            self.customers.list(scope_query(ctx, query)),
        )
        .await
    }
}
