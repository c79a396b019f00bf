//! SurrealDB implementation of [`ProductRepository`].

use chrono::{DateTime, Utc};
use larder_core::allergen::AllergenMask;
use larder_core::error::LarderResult;
use larder_core::models::product::{CreateProduct, Product, UpdateProduct};
use larder_core::repository::{ListQuery, PaginatedResult, ProductRepository};
use larder_core::tenancy::{TenantId, TenantScoped, assert_owned_by};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use super::{CountRow, order_clause, parse_tenant, parse_uuid};
use crate::error::DbError;

const SORT_FIELDS: &[(&str, &str)] = &[
    ("sku", "sku"),
    ("title", "title"),
    ("pricePennies", "price_pennies"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

fn parse_mask(raw: u32) -> Result<AllergenMask, DbError> {
    AllergenMask::try_from(raw).map_err(|e| DbError::corrupt("allergen_mask", e))
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct ProductRow {
    tenant_id: String,
    sku: String,
    title: String,
    ingredients_text: String,
    allergen_mask: u32,
    price_pennies: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self, id: Uuid) -> Result<Product, DbError> {
        Ok(Product {
            id,
            tenant_id: parse_tenant(&self.tenant_id)?,
            sku: self.sku,
            title: self.title,
            ingredients_text: self.ingredients_text,
            allergen_mask: parse_mask(self.allergen_mask)?,
            price_pennies: self.price_pennies,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ProductRowWithId {
    record_id: String,
    tenant_id: String,
    sku: String,
    title: String,
    ingredients_text: String,
    allergen_mask: u32,
    price_pennies: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRowWithId {
    fn try_into_product(self) -> Result<Product, DbError> {
        Ok(Product {
            id: parse_uuid("product", &self.record_id)?,
            tenant_id: parse_tenant(&self.tenant_id)?,
            sku: self.sku,
            title: self.title,
            ingredients_text: self.ingredients_text,
            allergen_mask: parse_mask(self.allergen_mask)?,
            price_pennies: self.price_pennies,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Product repository.
#[derive(Clone)]
pub struct SurrealProductRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProductRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    fn owned(tenant_id: TenantId, id: Uuid, rows: Vec<ProductRow>) -> LarderResult<Product> {
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("product", id))?;
        let product = row.into_product(id)?;
        assert_owned_by(tenant_id, &product)?;
        Ok(product)
    }
}

impl<C: Connection> ProductRepository for SurrealProductRepository<C> {
    async fn create(&self, tenant_id: TenantId, input: CreateProduct) -> LarderResult<Product> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('product', $id) SET \
                 tenant_id = $tenant_id, sku = $sku, title = $title, \
                 ingredients_text = $ingredients_text, \
                 allergen_mask = $allergen_mask, \
                 price_pennies = $price_pennies",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("sku", input.sku))
            .bind(("title", input.title))
            .bind(("ingredients_text", input.ingredients_text))
            .bind(("allergen_mask", u32::from(input.allergen_mask)))
            .bind(("price_pennies", input.price_pennies))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement("product", e))?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        let product = Self::owned(tenant_id, id, rows)?;
        debug!(tenant_id = %tenant_id, product_id = %id, sku = %product.sku, "product created");
        Ok(product)
    }

    async fn get_by_id(&self, tenant_id: TenantId, id: Uuid) -> LarderResult<Product> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('product', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        Self::owned(tenant_id, id, rows)
    }

    async fn get_by_sku(&self, tenant_id: TenantId, sku: &str) -> LarderResult<Product> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM product \
                 WHERE tenant_id = $tenant_id AND sku = $sku LIMIT 1",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("sku", sku.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("product", sku))?;
        let product = row.try_into_product()?;
        assert_owned_by(tenant_id, &product)?;
        Ok(product)
    }

    async fn update(
        &self,
        tenant_id: TenantId,
        id: Uuid,
        input: UpdateProduct,
    ) -> LarderResult<Product> {
        let mut sets = Vec::new();
        if input.sku.is_some() {
            sets.push("sku = $sku");
        }
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.ingredients_text.is_some() {
            sets.push("ingredients_text = $ingredients_text");
        }
        if input.allergen_mask.is_some() {
            sets.push("allergen_mask = $allergen_mask");
        }
        match input.price_pennies {
            Some(Some(_)) => sets.push("price_pennies = $price_pennies"),
            Some(None) => sets.push("price_pennies = NONE"),
            None => {}
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('product', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()));

        if let Some(sku) = input.sku {
            builder = builder.bind(("sku", sku));
        }
        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(ingredients_text) = input.ingredients_text {
            builder = builder.bind(("ingredients_text", ingredients_text));
        }
        if let Some(mask) = input.allergen_mask {
            builder = builder.bind(("allergen_mask", u32::from(mask)));
        }
        if let Some(Some(price)) = input.price_pennies {
            builder = builder.bind(("price_pennies", price));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement("product", e))?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        Self::owned(tenant_id, id, rows)
    }

    async fn delete(&self, tenant_id: TenantId, id: Uuid) -> LarderResult<()> {
        let result = self
            .db
            .query(
                "DELETE type::record('product', $id) \
                 WHERE tenant_id = $tenant_id RETURN BEFORE",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement("product", e))?;

        let rows: Vec<ProductRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("product", id).into());
        }
        Ok(())
    }

    async fn list(
        &self,
        query: TenantScoped<ListQuery>,
    ) -> LarderResult<PaginatedResult<Product>> {
        let (tenant_id, query) = query.into_parts();
        let order_by = order_clause(query.sort.as_ref(), SORT_FIELDS)?;
        let pagination = query.pagination;
        pagination.validate()?;
        let tenant_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM product \
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
                "SELECT meta::id(id) AS record_id, * FROM product \
                 WHERE tenant_id = $tenant_id \
                 {order_by} \
                 LIMIT $limit START $offset"
            ))
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProductRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| {
                let product = row.try_into_product()?;
                assert_owned_by(tenant_id, &product)?;
                Ok(product)
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
