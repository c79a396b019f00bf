//! SurrealDB implementation of [`ShopRepository`].

use chrono::{DateTime, Utc};
use larder_core::error::LarderResult;
use larder_core::models::shop::{CreateShop, Shop, UpdateShop};
use larder_core::repository::{ListQuery, PaginatedResult, ShopRepository};
use larder_core::tenancy::{TenantId, TenantScoped, assert_owned_by};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::{CountRow, order_clause, parse_tenant, parse_uuid};
use crate::error::DbError;

const SORT_FIELDS: &[(&str, &str)] = &[
    ("name", "name"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ShopRow {
    tenant_id: String,
    name: String,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ShopRow {
    fn into_shop(self, id: Uuid) -> Result<Shop, DbError> {
        Ok(Shop {
            id,
            tenant_id: parse_tenant(&self.tenant_id)?,
            name: self.name,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ShopRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ShopRowWithId {
    fn try_into_shop(self) -> Result<Shop, DbError> {
        Ok(Shop {
            id: parse_uuid("shop", &self.record_id)?,
            tenant_id: parse_tenant(&self.tenant_id)?,
            name: self.name,
            address: self.address,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Shop repository.
#[derive(Clone)]
pub struct SurrealShopRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealShopRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    fn owned(tenant_id: TenantId, id: Uuid, rows: Vec<ShopRow>) -> LarderResult<Shop> {
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("shop", id))?;
        let shop = row.into_shop(id)?;
        assert_owned_by(tenant_id, &shop)?;
        Ok(shop)
    }
}

impl<C: Connection> ShopRepository for SurrealShopRepository<C> {
    async fn create(&self, tenant_id: TenantId, input: CreateShop) -> LarderResult<Shop> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('shop', $id) SET \
                 tenant_id = $tenant_id, name = $name, address = $address",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("address", input.address))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement("shop", e))?;

        let rows: Vec<ShopRow> = result.take(0).map_err(DbError::from)?;
        let shop = Self::owned(tenant_id, id, rows)?;
        debug!(tenant_id = %tenant_id, shop_id = %id, "shop created");
        Ok(shop)
    }

    async fn get_by_id(&self, tenant_id: TenantId, id: Uuid) -> LarderResult<Shop> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('shop', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ShopRow> = result.take(0).map_err(DbError::from)?;
        Self::owned(tenant_id, id, rows)
    }

    async fn update(&self, tenant_id: TenantId, id: Uuid, input: UpdateShop) -> LarderResult<Shop> {
        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('shop', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement("shop", e))?;

        let rows: Vec<ShopRow> = result.take(0).map_err(DbError::from)?;
        Self::owned(tenant_id, id, rows)
    }

    async fn delete(&self, tenant_id: TenantId, id: Uuid) -> LarderResult<()> {
        let result = self
            .db
            .query(
                "DELETE type::record('shop', $id) \
                 WHERE tenant_id = $tenant_id RETURN BEFORE",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement("shop", e))?;

        let rows: Vec<ShopRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("shop", id).into());
        }
        Ok(())
    }

    async fn list(&self, query: TenantScoped<ListQuery>) -> LarderResult<PaginatedResult<Shop>> {
        let (tenant_id, query) = query.into_parts();
        let order_by = order_clause(query.sort.as_ref(), SORT_FIELDS)?;
        let pagination = query.pagination;
        pagination.validate()?;
        let tenant_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM shop \
                 WHERE tenant_id = $tenant_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(format!(
                "SELECT meta::id(id) AS record_id, * FROM shop \
                 WHERE tenant_id = $tenant_id \
                 {order_by} \
                 LIMIT $limit START $offset"
            ))
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ShopRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| {
                let shop = row.try_into_shop()?;
                assert_owned_by(tenant_id, &shop)?;
                Ok(shop)
            })
            .collect::<LarderResult<Vec<_>>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
