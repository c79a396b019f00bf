//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async and tenant-scoped. Point
//! operations take the caller's [`TenantId`] explicitly; list operations
//! take a [`TenantScoped`] query, which can only be produced by
//! [`scope_query`](crate::tenancy::scope_query). Implementations must
//! filter every statement by tenant and report foreign records as
//! `NotFound`.

use std::str::FromStr;

use uuid::Uuid;

use crate::error::{LarderError, LarderResult};
use crate::models::{
    customer::{CreateCustomer, Customer, UpdateCustomer},
    order::{NewOrder, Order, OrderFilter, OrderStatus},
    product::{CreateProduct, Product, UpdateProduct},
    shop::{CreateShop, Shop, UpdateShop},
};
use crate::tenancy::{TenantId, TenantScoped};

/// Pagination parameters for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Pagination {
    /// Largest offset or limit the store accepts (a signed 64-bit integer).
    pub const MAX: u64 = i64::MAX as u64;

    pub fn validate(&self) -> LarderResult<()> {
        if self.offset > Self::MAX {
            return Err(LarderError::validation(format!(
                "offset must not exceed {}",
                Self::MAX
            )));
        }
        if self.limit > Self::MAX {
            return Err(LarderError::validation(format!(
                "limit must not exceed {}",
                Self::MAX
            )));
        }
        Ok(())
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Requested ordering. The field is checked against each repository's
/// whitelist before it reaches a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl FromStr for Sort {
    type Err = LarderError;

    /// Parses `field` or `field,asc|desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(',') {
            Some((field, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" => SortDirection::Asc,
                    "desc" => SortDirection::Desc,
                    other => {
                        return Err(LarderError::validation(format!(
                            "unknown sort direction: {other}"
                        )));
                    }
                };
                (field.trim(), direction)
            }
            None => (s.trim(), SortDirection::Asc),
        };
        if field.is_empty() {
            return Err(LarderError::validation("sort field must not be empty"));
        }
        Ok(Sort {
            field: field.to_string(),
            direction,
        })
    }
}

impl Sort {
    /// Resolve the requested field against `allowed`, which maps wire
    /// names to column names.
    pub fn resolve(&self, allowed: &[(&str, &'static str)]) -> LarderResult<&'static str> {
        allowed
            .iter()
            .find(|(wire, _)| *wire == self.field)
            .map(|(_, column)| *column)
            .ok_or_else(|| LarderError::validation(format!("cannot sort by {}", self.field)))
    }
}

/// Pagination plus optional ordering for list endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub pagination: Pagination,
    pub sort: Option<Sort>,
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

pub trait ShopRepository: Send + Sync {
    fn create(
        &self,
        tenant_id: TenantId,
        input: CreateShop,
    ) -> impl Future<Output = LarderResult<Shop>> + Send;
    fn get_by_id(
        &self,
        tenant_id: TenantId,
        id: Uuid,
    ) -> impl Future<Output = LarderResult<Shop>> + Send;
    fn update(
        &self,
        tenant_id: TenantId,
        id: Uuid,
        input: UpdateShop,
    ) -> impl Future<Output = LarderResult<Shop>> + Send;
    fn delete(&self, tenant_id: TenantId, id: Uuid)
    -> impl Future<Output = LarderResult<()>> + Send;
    fn list(
        &self,
        query: TenantScoped<ListQuery>,
    ) -> impl Future<Output = LarderResult<PaginatedResult<Shop>>> + Send;
}

pub trait ProductRepository: Send + Sync {
    fn create(
        &self,
        tenant_id: TenantId,
        input: CreateProduct,
    ) -> impl Future<Output = LarderResult<Product>> + Send;
    fn get_by_id(
        &self,
        tenant_id: TenantId,
        id: Uuid,
    ) -> impl Future<Output = LarderResult<Product>> + Send;
    fn get_by_sku(
        &self,
        tenant_id: TenantId,
        sku: &str,
    ) -> impl Future<Output = LarderResult<Product>> + Send;
    fn update(
        &self,
        tenant_id: TenantId,
        id: Uuid,
        input: UpdateProduct,
    ) -> impl Future<Output = LarderResult<Product>> + Send;
    fn delete(&self, tenant_id: TenantId, id: Uuid)
    -> impl Future<Output = LarderResult<()>> + Send;
    fn list(
        &self,
        query: TenantScoped<ListQuery>,
    ) -> impl Future<Output = LarderResult<PaginatedResult<Product>>> + Send;
}

pub trait CustomerRepository: Send + Sync {
    fn create(
        &self,
        tenant_id: TenantId,
        input: CreateCustomer,
    ) -> impl Future<Output = LarderResult<Customer>> + Send;
    fn get_by_id(
        &self,
        tenant_id: TenantId,
        id: Uuid,
    ) -> impl Future<Output = LarderResult<Customer>> + Send;
    fn update(
        &self,
        tenant_id: TenantId,
        id: Uuid,
        input: UpdateCustomer,
    ) -> impl Future<Output = LarderResult<Customer>> + Send;
    fn delete(&self, tenant_id: TenantId, id: Uuid)
    -> impl Future<Output = LarderResult<()>> + Send;
    fn list(
        &self,
        query: TenantScoped<ListQuery>,
    ) -> impl Future<Output = LarderResult<PaginatedResult<Customer>>> + Send;
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

pub trait OrderRepository: Send + Sync {
    /// Persist a validated, priced order together with its items.
    fn create(&self, input: NewOrder) -> impl Future<Output = LarderResult<Order>> + Send;
    fn get_by_id(
        &self,
        tenant_id: TenantId,
        id: Uuid,
    ) -> impl Future<Output = LarderResult<Order>> + Send;
    fn list(
        &self,
        query: TenantScoped<ListQuery>,
        filter: OrderFilter,
    ) -> impl Future<Output = LarderResult<PaginatedResult<Order>>> + Send;

    /// Set the status to `next` only if it is still `expected`.
    ///
    /// Returns `NotFound` when the order is absent or foreign, and
    /// `Conflict` when another writer changed the status first.
    fn update_status(
        &self,
        tenant_id: TenantId,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> impl Future<Output = LarderResult<Order>> + Send;

    /// Delete an order and the items it owns.
    fn delete(&self, tenant_id: TenantId, id: Uuid)
    -> impl Future<Output = LarderResult<()>> + Send;
}
