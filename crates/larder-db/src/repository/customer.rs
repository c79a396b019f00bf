//! SurrealDB implementation of [`CustomerRepository`].

use chrono::{DateTime, Utc};
use larder_core::allergen::AllergenMask;
use larder_core::error::LarderResult;
use larder_core::models::customer::{CreateCustomer, Customer, UpdateCustomer};
use larder_core::repository::{CustomerRepository, ListQuery, PaginatedResult};
use larder_core::tenancy::{TenantId, TenantScoped, assert_owned_by};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, order_clause, parse_tenant, parse_uuid};
use crate::error::DbError;

const SORT_FIELDS: &[(&str, &str)] = &[
    ("name", "name"),
    ("email", "email"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct CustomerRow {
    tenant_id: String,
    name: String,
    email: String,
    phone: Option<String>,
    allergen_restrictions: u32,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRow {
    fn into_customer(self, id: Uuid) -> Result<Customer, DbError> {
        Ok(Customer {
            id,
            tenant_id: parse_tenant(&self.tenant_id)?,
            name: self.name,
            email: self.email,
            phone: self.phone,
            allergen_restrictions: AllergenMask::try_from(self.allergen_restrictions)
                .map_err(|e| DbError::corrupt("allergen_restrictions", e))?,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CustomerRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    email: String,
    phone: Option<String>,
    allergen_restrictions: u32,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CustomerRowWithId {
    fn try_into_customer(self) -> Result<Customer, DbError> {
        let id = parse_uuid("customer", &self.record_id)?;
        CustomerRow {
            tenant_id: self.tenant_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            allergen_restrictions: self.allergen_restrictions,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_customer(id)
    }
}

/// SurrealDB implementation of the Customer repository.
#[derive(Clone)]
pub struct SurrealCustomerRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCustomerRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    fn owned(tenant_id: TenantId, id: Uuid, rows: Vec<CustomerRow>) -> LarderResult<Customer> {
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::not_found("customer", id))?;
        let customer = row.into_customer(id)?;
        assert_owned_by(tenant_id, &customer)?;
        Ok(customer)
    }
}

impl<C: Connection> CustomerRepository for SurrealCustomerRepository<C> {
    async fn create(&self, tenant_id: TenantId, input: CreateCustomer) -> LarderResult<Customer> {
        let id = Uuid::new_v4();

        let result = self
            .db
            .query(
                "CREATE type::record('customer', $id) SET \
                 tenant_id = $tenant_id, name = $name, email = $email, \
                 phone = $phone, \
                 allergen_restrictions = $allergen_restrictions, \
                 notes = $notes",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind((
                "allergen_restrictions",
                u32::from(input.allergen_restrictions),
            ))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement("customer", e))?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        Self::owned(tenant_id, id, rows)
    }

    async fn get_by_id(&self, tenant_id: TenantId, id: Uuid) -> LarderResult<Customer> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('customer', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        Self::owned(tenant_id, id, rows)
    }

    async fn update(
        &self,
        tenant_id: TenantId,
        id: Uuid,
        input: UpdateCustomer,
    ) -> LarderResult<Customer> {
        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        match input.phone {
            Some(Some(_)) => sets.push("phone = $phone"),
            Some(None) => sets.push("phone = NONE"),
            None => {}
        }
        if input.allergen_restrictions.is_some() {
            sets.push("allergen_restrictions = $allergen_restrictions");
        }
        match input.notes {
            Some(Some(_)) => sets.push("notes = $notes"),
            Some(None) => sets.push("notes = NONE"),
            None => {}
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('customer', $id) SET {} \
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
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(Some(phone)) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(mask) = input.allergen_restrictions {
            builder = builder.bind(("allergen_restrictions", u32::from(mask)));
        }
        if let Some(Some(notes)) = input.notes {
            builder = builder.bind(("notes", notes));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::statement("customer", e))?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        Self::owned(tenant_id, id, rows)
    }

    async fn delete(&self, tenant_id: TenantId, id: Uuid) -> LarderResult<()> {
        let result = self
            .db
            .query(
                "DELETE type::record('customer', $id) \
                 WHERE tenant_id = $tenant_id RETURN BEFORE",
            )
            .bind(("id", id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::statement("customer", e))?;

        let rows: Vec<CustomerRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::not_found("customer", id).into());
        }
        Ok(())
    }

    async fn list(
        &self,
        query: TenantScoped<ListQuery>,
    ) -> LarderResult<PaginatedResult<Customer>> {
        let (tenant_id, query) = query.into_parts();
        let order_by = order_clause(query.sort.as_ref(), SORT_FIELDS)?;
        let pagination = query.pagination;
        pagination.validate()?;
        let tenant_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM customer \
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
                "SELECT meta::id(id) AS record_id, * FROM customer \
                 WHERE tenant_id = $tenant_id \
                 {order_by} \
                 LIMIT $limit START $offset"
            ))
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CustomerRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| {
                let customer = row.try_into_customer()?;
                assert_owned_by(tenant_id, &customer)?;
                Ok(customer)
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
