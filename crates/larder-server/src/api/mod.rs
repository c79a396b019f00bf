//! HTTP routes.
//!
//! Every route except `/health` resolves a tenant from the bearer
//! credential before touching data. Bodies and query strings use
//! camelCase field names.

mod catalog;
pub mod error;
pub mod extract;
mod orders;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use larder_core::allergen::Allergen;
use larder_core::repository::PaginatedResult;
use serde::Serialize;
use serde_json::{Value, json};

use crate::state::AppState;
use extract::Tenant;

/// Wire shape of a paginated list.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

impl<T> From<PaginatedResult<T>> for Page<T> {
    fn from(result: PaginatedResult<T>) -> Self {
        Self {
            items: result.items,
            total: result.total,
            offset: result.offset,
            limit: result.limit,
        }
    }
}

#[derive(Debug, Serialize)]
struct AllergenEntry {
    bit: u8,
    name: &'static str,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/allergens", get(allergens))
        .route("/orders", post(orders::create).get(orders::list))
        .route("/orders/{id}", get(orders::get).delete(orders::delete))
        .route("/orders/{id}/{action}", post(orders::transition))
        .route("/shops", post(catalog::create_shop).get(catalog::list_shops))
        .route(
            "/shops/{id}",
            get(catalog::get_shop)
                .put(catalog::update_shop)
                .delete(catalog::delete_shop),
        )
        .route(
            "/products",
            post(catalog::create_product).get(catalog::list_products),
        )
        .route(
            "/products/{id}",
            get(catalog::get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
        .route(
            "/customers",
            post(catalog::create_customer).get(catalog::list_customers),
        )
        .route(
            "/customers/{id}",
            get(catalog::get_customer)
                .put(catalog::update_customer)
                .delete(catalog::delete_customer),
        )
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn allergens(_tenant: Tenant) -> Json<Vec<AllergenEntry>> {
    Json(
        Allergen::ALL
            .into_iter()
            .map(|a| AllergenEntry {
                bit: a.bit(),
                name: a.name(),
            })
            .collect(),
    )
}
