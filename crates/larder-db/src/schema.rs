//! Schema definitions and migration runner for SurrealDB.
//!
//! Every table is SCHEMAFULL and carries a `tenant_id` string; UUIDs
//! are stored as strings and order statuses as their wire names with an
//! ASSERT constraint. Uniqueness rules (shop name, product SKU,
//! customer email) are per tenant and enforced by composite indexes.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Shops
-- =======================================================================
DEFINE TABLE shop SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE shop TYPE string;
DEFINE FIELD name ON TABLE shop TYPE string;
DEFINE FIELD address ON TABLE shop TYPE string DEFAULT '';
DEFINE FIELD created_at ON TABLE shop TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE shop TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_shop_tenant_name ON TABLE shop \
    COLUMNS tenant_id, name UNIQUE;

-- =======================================================================
-- Products
-- =======================================================================
DEFINE TABLE product SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE product TYPE string;
DEFINE FIELD sku ON TABLE product TYPE string;
DEFINE FIELD title ON TABLE product TYPE string;
DEFINE FIELD ingredients_text ON TABLE product TYPE string DEFAULT '';
DEFINE FIELD allergen_mask ON TABLE product TYPE int DEFAULT 0 \
    ASSERT $value >= 0 AND $value < 16384;
DEFINE FIELD price_pennies ON TABLE product TYPE option<int>;
DEFINE FIELD created_at ON TABLE product TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE product TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_product_tenant_sku ON TABLE product \
    COLUMNS tenant_id, sku UNIQUE;

-- =======================================================================
-- Customers
-- =======================================================================
DEFINE TABLE customer SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE customer TYPE string;
DEFINE FIELD name ON TABLE customer TYPE string;
DEFINE FIELD email ON TABLE customer TYPE string;
DEFINE FIELD phone ON TABLE customer TYPE option<string>;
DEFINE FIELD allergen_restrictions ON TABLE customer TYPE int DEFAULT 0 \
    ASSERT $value >= 0 AND $value < 16384;
DEFINE FIELD notes ON TABLE customer TYPE option<string>;
DEFINE FIELD created_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE customer TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_customer_tenant_email ON TABLE customer \
    COLUMNS tenant_id, email UNIQUE;

-- =======================================================================
-- Orders (items are embedded and owned by the order record)
-- =======================================================================
DEFINE TABLE sales_order SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE sales_order TYPE string;
DEFINE FIELD shop_id ON TABLE sales_order TYPE string;
DEFINE FIELD order_number ON TABLE sales_order TYPE string;
DEFINE FIELD status ON TABLE sales_order TYPE string \
    ASSERT $value IN ['DRAFT', 'PENDING', 'CONFIRMED', 'PREPARING', \
    'READY', 'COMPLETED', 'CANCELLED'];
DEFINE FIELD customer_name ON TABLE sales_order TYPE option<string>;
DEFINE FIELD customer_email ON TABLE sales_order TYPE option<string>;
DEFINE FIELD customer_phone ON TABLE sales_order TYPE option<string>;
DEFINE FIELD customer_id ON TABLE sales_order TYPE option<string>;
DEFINE FIELD notes ON TABLE sales_order TYPE option<string>;
DEFINE FIELD items ON TABLE sales_order TYPE array<object> DEFAULT [];
DEFINE FIELD items[*].product_id ON TABLE sales_order TYPE string;
DEFINE FIELD items[*].quantity ON TABLE sales_order TYPE int \
    ASSERT $value >= 1;
DEFINE FIELD items[*].unit_price_pennies ON TABLE sales_order TYPE int;
DEFINE FIELD items[*].total_price_pennies ON TABLE sales_order TYPE int;
DEFINE FIELD total_price_pennies ON TABLE sales_order TYPE int;
DEFINE FIELD created_at ON TABLE sales_order TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE sales_order TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_sales_order_tenant_number ON TABLE sales_order \
    COLUMNS tenant_id, order_number UNIQUE;
DEFINE INDEX idx_sales_order_tenant_status ON TABLE sales_order \
    COLUMNS tenant_id, status;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use larder_core::models::order::OrderStatus;

    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn status_constraint_lists_every_status() {
        for status in OrderStatus::ALL {
            assert!(
                SCHEMA_V1.contains(&format!("'{}'", status.as_str())),
                "status {status} missing from sales_order constraint"
            );
        }
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
