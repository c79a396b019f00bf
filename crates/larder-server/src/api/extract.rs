//! Request extractors: tenant context, list parameters, ids and bodies.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequestParts, Query};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use larder_core::TenantContext;
use larder_core::models::order::{OrderFilter, OrderStatus};
use larder_core::repository::{ListQuery, Pagination, Sort};
use serde::Deserialize;
use uuid::Uuid;

use super::error::ApiError;
use crate::state::AppState;

pub const TENANT_HEADER: &str = "x-tenant-id";

/// The caller's tenant, resolved from the bearer credential.
pub struct Tenant(pub TenantContext);

impl FromRequestParts<Arc<AppState>> for Tenant {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let tenant_header = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|v| v.to_str().ok());
        let ctx = state.resolver.resolve(authorization, tenant_header)?;
        Ok(Tenant(ctx))
    }
}

/// Query string accepted by list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<String>,
    pub status: Option<String>,
    pub shop_id: Option<Uuid>,
}

impl ListParams {
    pub fn from_query(query: Result<Query<ListParams>, QueryRejection>) -> Result<Self, ApiError> {
        query
            .map(|Query(params)| params)
            .map_err(|e| ApiError::validation(e.body_text()))
    }

    /// Pagination and sort, with `limit` clamped to `1..=max_page_size`.
    pub fn list_query(&self, max_page_size: u64) -> Result<ListQuery, ApiError> {
        let defaults = Pagination::default();
        let limit = self
            .limit
            .unwrap_or(defaults.limit)
            .clamp(1, max_page_size.max(1));
        let sort = self
            .sort
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<Sort>)
            .transpose()?;
        let pagination = Pagination {
            offset: self.offset.unwrap_or(defaults.offset),
            limit,
        };
        pagination.validate()?;
        Ok(ListQuery { pagination, sort })
    }

    pub fn order_filter(&self) -> Result<OrderFilter, ApiError> {
        Ok(OrderFilter {
            status: self
                .status
                .as_deref()
                .map(str::parse::<OrderStatus>)
                .transpose()?,
            shop_id: self.shop_id,
        })
    }
}

pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::validation(format!("invalid id: {raw}")))
}

/// Unwrap a JSON body, reporting malformed input as a validation error.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| ApiError::validation(e.body_text()))
}
