//! Shop, product and customer handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use larder_core::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use larder_core::models::product::{CreateProduct, Product, UpdateProduct};
use larder_core::models::shop::{CreateShop, Shop, UpdateShop};

use super::Page;
use super::error::ApiError;
use super::extract::{ListParams, Tenant, body, parse_id};
use crate::state::AppState;

// -- shops -----------------------------------------------------------------

pub(super) async fn create_shop(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    payload: Result<Json<CreateShop>, JsonRejection>,
) -> Result<(StatusCode, Json<Shop>), ApiError> {
    let created = state.catalog.create_shop(&ctx, body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn list_shops(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Page<Shop>>, ApiError> {
    let params = ListParams::from_query(query)?;
    let result = state
        .catalog
        .list_shops(&ctx, params.list_query(state.max_page_size)?)
        .await?;
    Ok(Json(result.into()))
}

pub(super) async fn get_shop(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
) -> Result<Json<Shop>, ApiError> {
    Ok(Json(state.catalog.get_shop(&ctx, parse_id(&id)?).await?))
}

pub(super) async fn update_shop(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
    payload: Result<Json<UpdateShop>, JsonRejection>,
) -> Result<Json<Shop>, ApiError> {
    let id = parse_id(&id)?;
    let updated = state.catalog.update_shop(&ctx, id, body(payload)?).await?;
    Ok(Json(updated))
}

pub(super) async fn delete_shop(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_shop(&ctx, parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- products --------------------------------------------------------------

pub(super) async fn create_product(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    payload: Result<Json<CreateProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let created = state.catalog.create_product(&ctx, body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn list_products(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Page<Product>>, ApiError> {
    let params = ListParams::from_query(query)?;
    let result = state
        .catalog
        .list_products(&ctx, params.list_query(state.max_page_size)?)
        .await?;
    Ok(Json(result.into()))
}

pub(super) async fn get_product(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.catalog.get_product(&ctx, parse_id(&id)?).await?))
}

pub(super) async fn update_product(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProduct>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&id)?;
    let updated = state.catalog.update_product(&ctx, id, body(payload)?).await?;
    Ok(Json(updated))
}

pub(super) async fn delete_product(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_product(&ctx, parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- customers -------------------------------------------------------------

pub(super) async fn create_customer(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    payload: Result<Json<CreateCustomer>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let created = state.catalog.create_customer(&ctx, body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn list_customers(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Page<Customer>>, ApiError> {
    let params = ListParams::from_query(query)?;
    let result = state
        .catalog
        .list_customers(&ctx, params.list_query(state.max_page_size)?)
        .await?;
    Ok(Json(result.into()))
}

pub(super) async fn get_customer(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    Ok(Json(state.catalog.get_customer(&ctx, parse_id(&id)?).await?))
}

pub(super) async fn update_customer(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCustomer>, JsonRejection>,
) -> Result<Json<Customer>, ApiError> {
    let id = parse_id(&id)?;
    let updated = state.catalog.update_customer(&ctx, id, body(payload)?).await?;
    Ok(Json(updated))
}

pub(super) async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_customer(&ctx, parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
