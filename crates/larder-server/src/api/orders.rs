//! Order handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use larder_core::models::order::{CreateOrder, Order, OrderAction};

use super::Page;
use super::error::ApiError;
use super::extract::{ListParams, Tenant, body, parse_id};
use crate::state::AppState;

pub(super) async fn create(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    payload: Result<Json<CreateOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.orders.create_order(&ctx, body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub(super) async fn list(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Page<Order>>, ApiError> {
    let params = ListParams::from_query(query)?;
    let result = state
        .orders
        .list_orders(
            &ctx,
            params.list_query(state.max_page_size)?,
            params.order_filter()?,
        )
        .await?;
    Ok(Json(result.into()))
}

pub(super) async fn get(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order = state.orders.get_order(&ctx, parse_id(&id)?).await?;
    Ok(Json(order))
}

pub(super) async fn delete(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.orders.delete_order(&ctx, parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn transition(
    State(state): State<Arc<AppState>>,
    Tenant(ctx): Tenant,
    Path((id, action)): Path<(String, String)>,
) -> Result<Json<Order>, ApiError> {
    let id = parse_id(&id)?;
    let action: OrderAction = action.parse()?;
    let order = state.orders.transition(&ctx, id, action).await?;
    Ok(Json(order))
}
