//! # Order Ledger Repository
//!
//! Database operations for sales orders, their line items and invoices.
//!
//! All three inserts are append-only and only ever run inside the checkout
//! transaction — an order header without its items or invoice is a state no
//! reader can observe.
//!
//! ## Snapshot Pattern
//! Product details (code, name, price) are copied onto the order item.
//! This preserves the sale history even if catalog details change later.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use kopi_core::{Invoice, SalesItem, SalesOrder};

const ORDER_COLUMNS: &str = "id, staff_id, customer_id, customer_name, total_cents, status, \
     payment_status, tag, memo, order_date, created_at, updated_at";

/// A persisted order with its line items and invoice — the "order graph"
/// receipt and reporting collaborators consume.
#[derive(Debug, Clone)]
pub struct OrderGraph {
    pub order: SalesOrder,
    pub items: Vec<SalesItem>,
    pub invoice: Option<Invoice>,
}

/// Repository for order ledger operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Loads an order with its items and invoice.
    pub async fn get(&self, order_id: &str) -> DbResult<Option<OrderGraph>> {
        let order = sqlx::query_as::<_, SalesOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM sales_orders WHERE id = ?1"
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, SalesItem>(
            r#"
            SELECT id, order_id, product_id, code_snapshot, name_snapshot,
                   quantity, unit_price_cents, line_total_cents, created_at
            FROM sales_order_items
            WHERE order_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, order_id, amount_cents, payment_method,
                   bank_name, account_number, account_holder, payment_date
            FROM invoices
            WHERE order_id = ?1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(Some(OrderGraph {
            order,
            items,
            invoice,
        }))
    }

    /// Counts orders (diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Transaction Primitives
    // =========================================================================

    /// Inserts the order header.
    pub async fn insert_order(conn: &mut SqliteConnection, order: &SalesOrder) -> DbResult<()> {
        debug!(id = %order.id, total = %order.total(), "Inserting sales order");

        sqlx::query(
            r#"
            INSERT INTO sales_orders (
                id, staff_id, customer_id, customer_name, total_cents,
                status, payment_status, tag, memo, order_date,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&order.id)
        .bind(&order.staff_id)
        .bind(&order.customer_id)
        .bind(&order.customer_name)
        .bind(order.total_cents)
        .bind(order.status)
        .bind(order.payment_status)
        .bind(&order.tag)
        .bind(&order.memo)
        .bind(order.order_date)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Inserts one line item.
    pub async fn insert_item(conn: &mut SqliteConnection, item: &SalesItem) -> DbResult<()> {
        debug!(order_id = %item.order_id, product_id = %item.product_id, "Inserting order item");

        sqlx::query(
            r#"
            INSERT INTO sales_order_items (
                id, order_id, product_id, code_snapshot, name_snapshot,
                quantity, unit_price_cents, line_total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&item.id)
        .bind(&item.order_id)
        .bind(&item.product_id)
        .bind(&item.code_snapshot)
        .bind(&item.name_snapshot)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.line_total_cents)
        .bind(item.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Inserts the invoice linked to the order (one-to-one).
    pub async fn insert_invoice(conn: &mut SqliteConnection, invoice: &Invoice) -> DbResult<()> {
        debug!(order_id = %invoice.order_id, amount = %invoice.amount(), "Inserting invoice");

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, order_id, amount_cents, payment_method,
                bank_name, account_number, account_holder, payment_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.order_id)
        .bind(invoice.amount_cents)
        .bind(invoice.payment_method)
        .bind(&invoice.bank_name)
        .bind(&invoice.account_number)
        .bind(&invoice.account_holder)
        .bind(invoice.payment_date)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
