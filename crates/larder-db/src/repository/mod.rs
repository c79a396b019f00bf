//! SurrealDB repository implementations.
//!
//! Every statement filters on `tenant_id`, and every row is checked
//! with [`assert_owned_by`](larder_core::tenancy::assert_owned_by)
//! after conversion.

mod customer;
mod order;
mod product;
mod shop;

pub use customer::SurrealCustomerRepository;
pub use order::SurrealOrderRepository;
pub use product::SurrealProductRepository;
pub use shop::SurrealShopRepository;

use larder_core::error::LarderResult;
use larder_core::repository::Sort;
use larder_core::tenancy::TenantId;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub(crate) total: u64,
}

pub(crate) fn parse_uuid(what: &str, raw: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(raw).map_err(|e| DbError::corrupt(&format!("invalid {what} UUID"), e))
}

pub(crate) fn parse_tenant(raw: &str) -> Result<TenantId, DbError> {
    parse_uuid("tenant", raw).map(TenantId::new)
}

/// Build the `ORDER BY` clause for a list query.
///
/// Only whitelisted column names reach the query string. `record_id`
/// breaks ties so pages are stable.
pub(crate) fn order_clause(
    sort: Option<&Sort>,
    allowed: &[(&str, &'static str)],
) -> LarderResult<String> {
    match sort {
        Some(sort) => {
            let column = sort.resolve(allowed)?;
            Ok(format!(
                "ORDER BY {column} {}, record_id ASC",
                sort.direction.as_sql()
            ))
        }
        None => Ok("ORDER BY created_at ASC, record_id ASC".to_string()),
    }
}
