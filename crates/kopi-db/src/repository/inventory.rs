//! # Inventory Repository
//!
//! Database operations for stock-keeping records.
//!
//! ## The Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Closing the read-modify-check race                         │
//! │                                                                         │
//! │  ❌ WRONG: read, compute, write                                         │
//! │     A reads stock=10    B reads stock=10                               │
//! │     A writes 10-6=4     B writes 10-6=4   ← lost update, and both      │
//! │     checks passed while the shelf is short 2 litres                    │
//! │                                                                         │
//! │  ✅ CORRECT: push the check into the UPDATE itself                      │
//! │     UPDATE inventory_items                                             │
//! │        SET stock_milli = stock_milli - :amt                            │
//! │      WHERE id = :id AND stock_milli >= :amt                            │
//! │                                                                         │
//! │     rows_affected == 1 → decrement applied, stock still >= 0           │
//! │     rows_affected == 0 → insufficient stock, abort the transaction     │
//! │                                                                         │
//! │  SQLite's single writer serializes the UPDATEs, so two concurrent      │
//! │  checkouts against one row apply in some total order — never           │
//! │  interleaved at the arithmetic level.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use kopi_core::{InventoryItem, Quantity};

const ITEM_COLUMNS: &str = "id, code, product, category, unit, stock_milli, limit_milli, \
     last_notified, created_at, updated_at";

/// Repository for inventory item database operations.
///
/// Pool-based methods serve standalone reads and catalog management;
/// associated functions taking a `&mut SqliteConnection` are the
/// primitives the checkout transaction composes.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Gets an item by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_on(&mut conn, id).await
    }

    /// Gets an item by its SKU code.
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists all items, ordered by code.
    pub async fn list(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items ORDER BY code"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts a new item.
    pub async fn insert(&self, item: &InventoryItem) -> DbResult<()> {
        debug!(id = %item.id, code = %item.code, "Inserting inventory item");

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, code, product, category, unit,
                stock_milli, limit_milli, last_notified,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&item.id)
        .bind(&item.code)
        .bind(&item.product)
        .bind(item.category)
        .bind(item.unit)
        .bind(item.stock_milli)
        .bind(item.limit_milli)
        .bind(item.last_notified)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Applies a restock or correction delta (positive or negative).
    ///
    /// Catalog-management operation — the checkout path never uses this;
    /// its decrements go through [`Self::try_decrement`] so the
    /// non-negativity check cannot be bypassed.
    pub async fn adjust_stock(&self, id: &str, delta: Quantity) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventory_items
            SET stock_milli = stock_milli + ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(delta.milli())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        Ok(())
    }

    /// Updates an item's reorder limit.
    pub async fn set_limit(&self, id: &str, limit: Option<Quantity>) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventory_items
            SET limit_milli = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(limit.map(|q| q.milli()))
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        Ok(())
    }

    // =========================================================================
    // Transaction Primitives
    // =========================================================================

    /// Gets an item on an explicit connection (checkout reads go through the
    /// transaction's connection so they see its own writes).
    pub async fn get_on(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(item)
    }

    /// Atomically decrements stock if and only if enough is on hand.
    ///
    /// ## Returns
    /// * `Ok(Some(new_stock))` - decrement applied
    /// * `Ok(None)` - insufficient stock (or the row vanished); nothing
    ///   written. The caller decides how to abort — it has the item loaded
    ///   and can name it in the error.
    pub async fn try_decrement(
        conn: &mut SqliteConnection,
        id: &str,
        amount: Quantity,
    ) -> DbResult<Option<Quantity>> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventory_items
            SET stock_milli = stock_milli - ?2, updated_at = ?3
            WHERE id = ?1 AND stock_milli >= ?2
            "#,
        )
        .bind(id)
        .bind(amount.milli())
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            debug!(id = %id, amount = %amount, "Conditional decrement refused");
            return Ok(None);
        }

        let new_stock: i64 =
            sqlx::query_scalar("SELECT stock_milli FROM inventory_items WHERE id = ?1")
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(Some(Quantity::from_milli(new_stock)))
    }

    /// Stamps the last time a stock alert fired for this item.
    pub async fn mark_notified(
        conn: &mut SqliteConnection,
        id: &str,
        at: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE inventory_items
            SET last_notified = ?2, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(at)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory item", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
