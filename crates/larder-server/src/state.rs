//! Shared application state handed to every handler.

use larder_auth::TenantResolver;
use larder_db::repository::{
    SurrealCustomerRepository, SurrealOrderRepository, SurrealProductRepository,
    SurrealShopRepository,
};
use larder_orders::{CatalogService, OrderService};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::config::ServerConfig;

pub type Orders = OrderService<
    SurrealOrderRepository<Any>,
    SurrealShopRepository<Any>,
    SurrealProductRepository<Any>,
    SurrealCustomerRepository<Any>,
>;

pub type Catalog = CatalogService<
    SurrealShopRepository<Any>,
    SurrealProductRepository<Any>,
    SurrealCustomerRepository<Any>,
>;

pub struct AppState {
    pub orders: Orders,
    pub catalog: Catalog,
    pub resolver: TenantResolver,
    pub max_page_size: u64,
}

impl AppState {
    pub fn new(db: Surreal<Any>, resolver: TenantResolver, config: &ServerConfig) -> Self {
        let orders = OrderService::new(
            SurrealOrderRepository::new(db.clone()),
            SurrealShopRepository::new(db.clone()),
            SurrealProductRepository::new(db.clone()),
            SurrealCustomerRepository::new(db.clone()),
            config.orders.clone(),
        );
        let catalog = CatalogService::new(
            SurrealShopRepository::new(db.clone()),
            SurrealProductRepository::new(db.clone()),
            SurrealCustomerRepository::new(db),
            config.orders.store_timeout(),
        );
        Self {
            orders,
            catalog,
            resolver,
            max_page_size: config.server.max_page_size,
        }
    }
}
